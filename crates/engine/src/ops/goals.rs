use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ContributionCmd, EngineError, GoalContribution, GoalProgress, GoalStatus, GoalUpdate,
    MoneyCents, NewGoal, ResultEngine, SavingsGoal, goal_contributions, savings_goals,
    util::require_positive,
};

use super::{Engine, normalize_required_name, normalize_text, with_tx};

/// A goal, its contributions (oldest first) and the progress derived from
/// them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalView {
    pub goal: SavingsGoal,
    pub contributions: Vec<GoalContribution>,
    pub progress: GoalProgress,
}

impl GoalView {
    fn new(goal: SavingsGoal, contributions: Vec<GoalContribution>, today: NaiveDate) -> Self {
        let progress = GoalProgress::of(&goal, &contributions, today);
        Self {
            goal,
            contributions,
            progress,
        }
    }
}

fn validate_quota(quota: MoneyCents) -> ResultEngine<()> {
    if quota.is_negative() {
        return Err(EngineError::InvalidAmount(
            "quota amount must be >= 0".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    pub async fn new_goal(&self, user_id: Uuid, cmd: NewGoal) -> ResultEngine<SavingsGoal> {
        require_positive(cmd.target_amount, "target amount")?;
        validate_quota(cmd.quota_amount)?;
        let name = normalize_required_name(&cmd.name, "goal")?;
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            let goal = SavingsGoal {
                id: Uuid::new_v4(),
                user_id,
                name,
                description: normalize_text(&cmd.description),
                color: normalize_text(&cmd.color),
                target_amount: cmd.target_amount,
                quota_amount: cmd.quota_amount,
                frequency: cmd.frequency,
                status: GoalStatus::Active,
                created_at: Utc::now(),
            };
            savings_goals::ActiveModel::from(&goal)
                .insert(&db_tx)
                .await?;
            Ok(goal)
        })
    }

    pub async fn update_goal(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        update: GoalUpdate,
    ) -> ResultEngine<SavingsGoal> {
        if let Some(target) = update.target_amount {
            require_positive(target, "target amount")?;
        }
        if let Some(quota) = update.quota_amount {
            validate_quota(quota)?;
        }
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "goal"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let mut goal = self.require_goal(&db_tx, user_id, goal_id).await?;
            if let Some(name) = name {
                goal.name = name;
            }
            if let Some(description) = update.description.as_deref() {
                goal.description = normalize_text(description);
            }
            if let Some(color) = update.color.as_deref() {
                goal.color = normalize_text(color);
            }
            if let Some(target) = update.target_amount {
                goal.target_amount = target;
            }
            if let Some(quota) = update.quota_amount {
                goal.quota_amount = quota;
            }
            if let Some(frequency) = update.frequency {
                goal.frequency = frequency;
            }

            let mut active = savings_goals::ActiveModel::from(&goal);
            active.id = ActiveValue::Unchanged(goal.id);
            active.user_id = ActiveValue::Unchanged(goal.user_id);
            active.created_at = ActiveValue::Unchanged(goal.created_at);
            active.update(&db_tx).await?;
            Ok(goal)
        })
    }

    pub async fn delete_goal(&self, user_id: Uuid, goal_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_goal(&db_tx, user_id, goal_id).await?;
            savings_goals::Entity::delete_by_id(goal_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// A goal with its progress as of `today`.
    pub async fn goal(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        today: NaiveDate,
    ) -> ResultEngine<GoalView> {
        with_tx!(self, |db_tx| {
            let goal = self.require_goal(&db_tx, user_id, goal_id).await?;
            let contributions = goal_contributions::Entity::find()
                .filter(goal_contributions::Column::GoalId.eq(goal.id))
                .order_by_asc(goal_contributions::Column::Date)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(GoalContribution::from)
                .collect();
            Ok(GoalView::new(goal, contributions, today))
        })
    }

    /// Goals of a user, newest first, with their progress as of `today`.
    pub async fn goals(&self, user_id: Uuid, today: NaiveDate) -> ResultEngine<Vec<GoalView>> {
        with_tx!(self, |db_tx| {
            let goals = savings_goals::Entity::find()
                .filter(savings_goals::Column::UserId.eq(user_id))
                .order_by_desc(savings_goals::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(SavingsGoal::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            if goals.is_empty() {
                return Ok(Vec::new());
            }

            let mut by_goal: HashMap<Uuid, Vec<GoalContribution>> = HashMap::new();
            let contributions = goal_contributions::Entity::find()
                .filter(goal_contributions::Column::GoalId.is_in(goals.iter().map(|g| g.id)))
                .order_by_asc(goal_contributions::Column::Date)
                .all(&db_tx)
                .await?;
            for model in contributions {
                by_goal
                    .entry(model.goal_id)
                    .or_default()
                    .push(GoalContribution::from(model));
            }

            Ok(goals
                .into_iter()
                .map(|goal| {
                    let contributions = by_goal.remove(&goal.id).unwrap_or_default();
                    GoalView::new(goal, contributions, today)
                })
                .collect())
        })
    }

    /// Appends a contribution. Accounts are not touched.
    pub async fn add_contribution(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        cmd: ContributionCmd,
    ) -> ResultEngine<GoalContribution> {
        require_positive(cmd.amount, "contribution amount")?;
        let contribution = with_tx!(self, |db_tx| {
            let goal = self.require_goal(&db_tx, user_id, goal_id).await?;
            let contribution = GoalContribution {
                id: Uuid::new_v4(),
                goal_id: goal.id,
                amount: cmd.amount,
                date: cmd.date,
                notes: normalize_text(&cmd.notes),
                is_quota_payment: cmd.is_quota_payment,
            };
            goal_contributions::ActiveModel::from(&contribution)
                .insert(&db_tx)
                .await?;
            Ok(contribution)
        })?;
        tracing::debug!(%goal_id, amount = %contribution.amount, "goal contribution added");
        Ok(contribution)
    }

    /// Marks a goal as achieved, whatever its progress.
    pub async fn mark_achieved(&self, user_id: Uuid, goal_id: Uuid) -> ResultEngine<SavingsGoal> {
        with_tx!(self, |db_tx| {
            let mut goal = self.require_goal(&db_tx, user_id, goal_id).await?;
            savings_goals::ActiveModel {
                id: ActiveValue::Unchanged(goal.id),
                status: ActiveValue::Set(GoalStatus::Achieved.as_str().to_string()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            goal.status = GoalStatus::Achieved;
            Ok(goal)
        })
    }
}
