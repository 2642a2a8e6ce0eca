//! Landing page.

use axum::response::{IntoResponse, Redirect, Response};

use crate::resources::DataContext;
use crate::views::{PageTemplate, Section};

/// Signed-in users go to their role's home; visitors get a sign-in link.
///
/// Also the fallback target of several guard redirects, so it must render
/// for everyone.
pub async fn index(ctx: DataContext) -> Response {
    if let Some(user) = ctx.user() {
        return Redirect::to(user.role.home_path()).into_response();
    }

    PageTemplate::new(&ctx, "Welcome to FreshWash")
        .await
        .section(
            Section::new("")
                .notice("Track your laundry, manage outlets and run daily operations in one place.")
                .link("Sign in", "/login"),
        )
        .into_response()
}
