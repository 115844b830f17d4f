#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::Database;
use uuid::Uuid;

use engine::{
    Account, AccountKind, AccountSubtype, Engine, LedgerSettings, MoneyCents, NewAccount,
};
use migration::MigratorTrait;

pub async fn engine_with_db() -> Engine {
    engine_with_settings(LedgerSettings::default()).await
}

pub async fn engine_with_settings(settings: LedgerSettings) -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder()
        .database(db)
        .settings(settings)
        .build()
        .await
        .unwrap()
}

pub async fn alice(engine: &Engine) -> Uuid {
    engine
        .new_user("alice@example.com", "Alice")
        .await
        .unwrap()
        .id
}

pub fn cents(value: i64) -> MoneyCents {
    MoneyCents::new(value)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub async fn debit_account(engine: &Engine, user_id: Uuid, name: &str, balance: i64) -> Account {
    engine
        .new_account(
            user_id,
            NewAccount::new(name, AccountKind::Debit, AccountSubtype::Checking)
                .balance(cents(balance)),
        )
        .await
        .unwrap()
}

pub async fn credit_card(engine: &Engine, user_id: Uuid, owed: i64, limit: i64) -> Account {
    engine
        .new_account(
            user_id,
            NewAccount::new("Card", AccountKind::Credit, AccountSubtype::CreditCard)
                .balance(cents(owed))
                .credit_limit(cents(limit)),
        )
        .await
        .unwrap()
}

pub async fn balance_of(engine: &Engine, user_id: Uuid, account_id: Uuid) -> MoneyCents {
    engine.account(user_id, account_id).await.unwrap().balance
}
