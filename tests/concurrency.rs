//! Concurrency scenarios for the account service: lock serialization,
//! deadlock freedom under opposite-direction and cyclic transfers, and the
//! ledger reconciliation invariant under parallel load.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures::future::join_all;
use rust_decimal::Decimal;

use paycore::{AccountService, AccountStore, Ledger, NewUser, User, UserDirectory};

struct Harness {
    service: Arc<AccountService>,
    directory: Arc<UserDirectory>,
    ledger: Arc<Ledger>,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(AccountStore::new());
        let directory = Arc::new(UserDirectory::new());
        let ledger = Arc::new(Ledger::new());
        let service = Arc::new(AccountService::new(
            store,
            Arc::clone(&directory),
            Arc::clone(&ledger),
        ));
        Self {
            service,
            directory,
            ledger,
        }
    }

    fn register_user(&self) -> User {
        self.directory.create(NewUser {
            name: "ismaley".to_string(),
            document_number: "1102301023".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1986, 7, 28).unwrap(),
        })
    }
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Seed 3000, then run 51 deposits of 50 and 51 withdrawals of 50
/// concurrently. Net zero: the final balance must be exactly 3000, with no
/// lost or doubled update.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_net_zero_operations_settle_exactly() {
    let harness = Harness::new();
    let user = harness.register_user();
    let account = harness.service.create_account(&user.id).unwrap();

    harness
        .service
        .deposit(&user.id, account.id, dec("3000"))
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for _ in 0..51 {
        let service = Arc::clone(&harness.service);
        let user_id = user.id;
        let account_id = account.id;
        tasks.push(tokio::spawn(async move {
            service.deposit(&user_id, account_id, dec("50")).await
        }));

        let service = Arc::clone(&harness.service);
        let user_id = user.id;
        tasks.push(tokio::spawn(async move {
            service.withdraw(&user_id, account_id, dec("50")).await
        }));
    }

    for result in join_all(tasks).await {
        result.expect("task panicked").expect("operation failed");
    }

    let balance = harness
        .service
        .get_account(&user.id, account.id)
        .unwrap()
        .balance;
    assert_eq!(balance, dec("3000"));

    // Reconciliation: balance equals the net of the ledger, and the ledger
    // holds one entry per completed operation.
    assert_eq!(harness.ledger.net_for_account(account.id), dec("3000"));
    assert_eq!(harness.ledger.list_for_account(account.id).len(), 103);
}

/// Opposite-direction transfers over the same pair plus a cyclic chain.
/// With locks taken in ascending account-id order this must finish well
/// inside the timeout instead of deadlocking.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn opposite_direction_and_cyclic_transfers_complete() {
    let harness = Harness::new();
    let user = harness.register_user();
    let a = harness.service.create_account(&user.id).unwrap();
    let b = harness.service.create_account(&user.id).unwrap();
    let c = harness.service.create_account(&user.id).unwrap();

    for account_id in [a.id, b.id, c.id] {
        harness
            .service
            .deposit(&user.id, account_id, dec("30"))
            .await
            .unwrap();
    }

    let pairs = [(a.id, b.id), (b.id, a.id), (b.id, c.id), (c.id, a.id)];
    let mut tasks = Vec::new();
    for (source, destination) in pairs {
        let service = Arc::clone(&harness.service);
        let user_id = user.id;
        tasks.push(tokio::spawn(async move {
            service
                .transfer_money_between_accounts(&user_id, source, destination, dec("10"))
                .await
        }));
    }

    let results = tokio::time::timeout(Duration::from_secs(10), join_all(tasks))
        .await
        .expect("transfers deadlocked");

    for result in results {
        result.expect("task panicked").expect("transfer failed");
    }

    // Money is conserved and no balance went negative.
    let mut total = Decimal::ZERO;
    for account_id in [a.id, b.id, c.id] {
        let balance = harness
            .service
            .get_account(&user.id, account_id)
            .unwrap()
            .balance;
        assert!(balance >= Decimal::ZERO);
        total += balance;
    }
    assert_eq!(total, dec("90"));
}

/// Hammer one pair of accounts with transfers in both directions. Every
/// transfer serializes on the pair's locks; balances must end where they
/// started and reconcile with the ledger.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn repeated_bidirectional_transfers_conserve_balances() {
    let harness = Harness::new();
    let user = harness.register_user();
    let a = harness.service.create_account(&user.id).unwrap();
    let b = harness.service.create_account(&user.id).unwrap();

    harness
        .service
        .deposit(&user.id, a.id, dec("100"))
        .await
        .unwrap();
    harness
        .service
        .deposit(&user.id, b.id, dec("100"))
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..100 {
        let service = Arc::clone(&harness.service);
        let user_id = user.id;
        let (source, destination) = if i % 2 == 0 { (a.id, b.id) } else { (b.id, a.id) };
        tasks.push(tokio::spawn(async move {
            service
                .transfer_money_between_accounts(&user_id, source, destination, dec("1"))
                .await
        }));
    }

    let results = tokio::time::timeout(Duration::from_secs(10), join_all(tasks))
        .await
        .expect("transfers deadlocked");
    for result in results {
        result.expect("task panicked").expect("transfer failed");
    }

    for account_id in [a.id, b.id] {
        let balance = harness
            .service
            .get_account(&user.id, account_id)
            .unwrap()
            .balance;
        assert_eq!(balance, dec("100"));
        assert_eq!(harness.ledger.net_for_account(account_id), dec("100"));
        // 1 seed deposit + 50 outgoing + 50 incoming entries
        assert_eq!(harness.ledger.list_for_account(account_id).len(), 101);
    }
}

/// Failed transfers racing successful ones never corrupt state: an
/// overdraw attempt leaves both accounts untouched even while other
/// operations are in flight.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn failed_transfers_do_not_disturb_concurrent_traffic() {
    let harness = Harness::new();
    let user = harness.register_user();
    let source = harness.service.create_account(&user.id).unwrap();
    let destination = harness.service.create_account(&user.id).unwrap();

    harness
        .service
        .deposit(&user.id, source.id, dec("20.99"))
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let service = Arc::clone(&harness.service);
        let user_id = user.id;
        let (source_id, destination_id) = (source.id, destination.id);
        tasks.push(tokio::spawn(async move {
            service
                .transfer_money_between_accounts(&user_id, source_id, destination_id, dec("500.45"))
                .await
        }));
    }

    for result in join_all(tasks).await {
        let transfer = result.expect("task panicked");
        assert!(transfer.is_err(), "overdraw transfer must fail");
    }

    assert_eq!(
        harness
            .service
            .get_account(&user.id, source.id)
            .unwrap()
            .balance,
        dec("20.99")
    );
    assert_eq!(
        harness
            .service
            .get_account(&user.id, destination.id)
            .unwrap()
            .balance,
        Decimal::ZERO
    );
    // Only the seed deposit is on the books.
    assert_eq!(harness.ledger.entry_count(), 1);
}
