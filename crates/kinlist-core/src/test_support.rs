//! Fixtures shared by the unit tests.

use std::sync::Arc;

use crate::{
    models::{Decision, NewUser, UserId},
    store::{MemoryStore, SocialStore},
    FriendshipLedger,
};

/// A fresh memory store with one user per name; `name@example.com`.
pub(crate) fn store_with_users(names: &[&str]) -> (Arc<MemoryStore>, Vec<UserId>) {
    let store = Arc::new(MemoryStore::new());
    let ids = names
        .iter()
        .map(|&name| {
            let user = NewUser::new(&format!("{name}@example.com"), Some(name))
                .expect("valid fixture user");
            store.insert_user(&user).expect("insert fixture user").id
        })
        .collect();
    (store, ids)
}

/// Runs the full request/accept workflow between `a` and `b`.
pub(crate) fn befriend<S: SocialStore + ?Sized>(store: &Arc<S>, a: UserId, b: UserId) {
    let ledger = FriendshipLedger::new(Arc::clone(store));
    let request = ledger.send_request(a, b).expect("send request");
    ledger
        .respond_to_request(request.id, b, Decision::Accept)
        .expect("accept request");
}
