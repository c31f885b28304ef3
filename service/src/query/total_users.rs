//! [`Query`] of the total count of directory users.

use std::convert::Infallible;

use crate::{read::user::TotalCount, Service};

use super::Query;

/// Queries the [`TotalCount`] of directory users, as of the last completed
/// sweep.
#[derive(Clone, Copy, Debug)]
pub struct TotalUsers;

impl<Dir, Gw> Query<TotalUsers> for Service<Dir, Gw> {
    type Ok = TotalCount;
    type Err = Infallible;

    async fn execute(&self, _: TotalUsers) -> Result<Self::Ok, Self::Err> {
        Ok(self.total_users().get())
    }
}
