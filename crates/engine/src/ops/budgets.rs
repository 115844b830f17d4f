use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Budget, BudgetStatus, EngineError, MoneyCents, NewBudget, ResultEngine, TransactionKind,
    budgets, transactions,
    util::{month_range, require_positive},
};

use super::{Engine, with_tx};

fn validate_month(month: u32) -> ResultEngine<()> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::InvalidAmount(format!(
            "month must be within 1..=12, got {month}"
        )));
    }
    Ok(())
}

impl Engine {
    /// Sets a monthly limit on an expense category. One budget per category
    /// and month.
    pub async fn new_budget(&self, user_id: Uuid, cmd: NewBudget) -> ResultEngine<Budget> {
        require_positive(cmd.limit_amount, "budget limit")?;
        validate_month(cmd.month)?;
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, user_id, cmd.category_id)
                .await?;

            let exists = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(user_id))
                .filter(budgets::Column::CategoryId.eq(cmd.category_id))
                .filter(budgets::Column::Month.eq(cmd.month as i32))
                .filter(budgets::Column::Year.eq(cmd.year))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::DuplicateBudget(format!(
                    "category {} already has a budget for {}-{:02}",
                    cmd.category_id, cmd.year, cmd.month
                )));
            }

            let budget = Budget {
                id: Uuid::new_v4(),
                user_id,
                category_id: cmd.category_id,
                month: cmd.month,
                year: cmd.year,
                limit_amount: cmd.limit_amount,
                created_at: Utc::now(),
            };
            budgets::ActiveModel::from(&budget).insert(&db_tx).await?;
            Ok(budget)
        })
    }

    pub async fn update_budget_limit(
        &self,
        user_id: Uuid,
        budget_id: Uuid,
        limit_amount: MoneyCents,
    ) -> ResultEngine<Budget> {
        require_positive(limit_amount, "budget limit")?;
        with_tx!(self, |db_tx| {
            let mut budget = self.require_budget(&db_tx, user_id, budget_id).await?;
            budgets::ActiveModel {
                id: ActiveValue::Unchanged(budget.id),
                limit_amount: ActiveValue::Set(limit_amount.cents()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            budget.limit_amount = limit_amount;
            Ok(budget)
        })
    }

    pub async fn delete_budget(&self, user_id: Uuid, budget_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_budget(&db_tx, user_id, budget_id).await?;
            budgets::Entity::delete_by_id(budget_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Budgets of a month with what was spent on each category in that
    /// calendar month.
    pub async fn budgets_for_month(
        &self,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> ResultEngine<Vec<BudgetStatus>> {
        validate_month(month)?;
        let (start, end) = month_range(year, month)?;
        with_tx!(self, |db_tx| {
            let budgets = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(user_id))
                .filter(budgets::Column::Month.eq(month as i32))
                .filter(budgets::Column::Year.eq(year))
                .order_by_asc(budgets::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Budget::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let spent: HashMap<Uuid, MoneyCents> = transactions::Entity::find()
                .select_only()
                .column(transactions::Column::CategoryId)
                .column_as(Expr::col(transactions::Column::AmountMinor).sum(), "spent")
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::Kind.eq(TransactionKind::Expense.as_str()))
                .filter(transactions::Column::CategoryId.is_not_null())
                .filter(transactions::Column::Date.gte(start))
                .filter(transactions::Column::Date.lt(end))
                .group_by(transactions::Column::CategoryId)
                .into_tuple::<(Option<Uuid>, Option<i64>)>()
                .all(&db_tx)
                .await?
                .into_iter()
                .filter_map(|(category_id, total)| {
                    Some((category_id?, MoneyCents::new(total.unwrap_or_default())))
                })
                .collect();

            Ok(budgets
                .into_iter()
                .map(|budget| {
                    let spent = spent
                        .get(&budget.category_id)
                        .copied()
                        .unwrap_or(MoneyCents::ZERO);
                    BudgetStatus { budget, spent }
                })
                .collect())
        })
    }
}
