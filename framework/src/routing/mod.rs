mod group;
mod router;

pub use group::{GroupBuilder, GroupRouter};
pub use router::{boxed, inject, BoxedHandler, RouteBuilder, RouteMatch, Router};
