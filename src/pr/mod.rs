//! Pull requests: selecting one from user input and local state, and
//! checking one out.

mod checkout;
mod finder;
mod model;
mod selector;

pub use checkout::{Checkout, CheckoutOptions, CheckoutPlan, CheckoutStep, OnFailure};
pub use finder::{FindError, FindOptions, PullRequestFinder};
pub use model::{PrField, PrState, ProjectItem, PullRequest, selection};
pub use selector::PrSelector;
