//! Types built against `placeholders` alone, with the engine reached through
//! its `placeholders::cmp` re-export.

use placeholders::cmp::Compare;
use placeholders::{Pointer, Ref};

#[derive(Compare, Default)]
#[compare(crate = placeholders::cmp)]
pub struct Account {
	pub owner: Ref<String>,
	pub balance: i64,
}

#[derive(Compare, Pointer, Default)]
#[compare(crate = placeholders::cmp, transparent)]
pub struct AccountPtr(pub Option<Ref<Account>>);

#[derive(Compare)]
#[compare(crate = placeholders::cmp)]
pub enum Event<T> {
	Opened(AccountPtr),
	Deposit { account: AccountPtr, amount: T },
	Closed,
}
