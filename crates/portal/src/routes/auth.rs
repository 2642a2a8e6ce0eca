//! Sign in and sign out.

use axum::{
    Form,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{info, instrument};

use freshwash_core::guard::LOGIN_PATH;

use crate::api::types::LoginRequest;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{sign_in, sign_out};
use crate::models::CurrentUser;
use crate::resources::{self, DataContext};
use crate::views::{LoginTemplate, UserBadge};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub email: Option<String>,
}

/// Display the login page.
pub async fn login_page(ctx: DataContext, Query(query): Query<LoginQuery>) -> Response {
    if let Some(user) = ctx.user() {
        return Redirect::to(user.role.home_path()).into_response();
    }

    LoginTemplate {
        title: "Sign in".to_string(),
        user: ctx.user().map(UserBadge::from),
        nav: Vec::new(),
        toasts: ctx.take_toasts().await,
        email: query.email.unwrap_or_default(),
    }
    .into_response()
}

/// Handle login form submission.
///
/// A failed login queues the API's message as a toast and goes back to the
/// form with the email filled in.
#[instrument(skip(ctx, form), fields(email = %form.email))]
pub async fn login(ctx: DataContext, Form(form): Form<LoginForm>) -> Result<Redirect, AppError> {
    let request = LoginRequest {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    let outcome = resources::auth::login(&ctx, &request).await;
    let response = match outcome.result {
        Ok(response) => response,
        Err(_) => {
            let email: String = url::form_urlencoded::byte_serialize(request.email.as_bytes()).collect();
            return Ok(Redirect::to(&format!("{LOGIN_PATH}?email={email}")));
        }
    };

    let user = CurrentUser::from(response.user);
    sign_in(ctx.session(), &user, &response.access_token).await?;
    set_sentry_user(user.id, Some(&user.email));
    info!(user_id = %user.id, role = %user.role, "user signed in");

    Ok(Redirect::to(user.role.home_path()))
}

/// Sign out: tell the API, drop the user's cached queries, end the session.
#[instrument(skip(ctx))]
pub async fn logout(ctx: DataContext) -> Result<Redirect, AppError> {
    resources::auth::logout(&ctx).await;
    ctx.state().cache().clear_scope(ctx.scope());
    sign_out(ctx.session()).await?;
    clear_sentry_user();

    Ok(Redirect::to(LOGIN_PATH))
}
