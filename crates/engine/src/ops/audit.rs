use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{AuditEntry, AuditRecord, ResultEngine, audit_logs};

use super::{Engine, with_tx};

impl Engine {
    /// Stores an audit entry.
    ///
    /// Runs outside any ledger transaction. A failure is logged and
    /// swallowed: auditing never fails the operation being audited.
    pub async fn record_audit(&self, entry: AuditEntry) {
        let result = audit_logs::ActiveModel::from(&entry)
            .insert(&self.database)
            .await;
        if let Err(err) = result {
            tracing::warn!(action = %entry.action, error = %err, "failed to write audit log");
        }
    }

    /// Audit entries of a user, newest first.
    pub async fn audit_records(&self, user_id: Uuid) -> ResultEngine<Vec<AuditRecord>> {
        with_tx!(self, |db_tx| {
            let models = audit_logs::Entity::find()
                .filter(audit_logs::Column::UserId.eq(user_id))
                .order_by_desc(audit_logs::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(AuditRecord::from).collect())
        })
    }
}
