// ============================================================================
// SESSION VIEWMODEL - Login, registro, OTP y logout
// ============================================================================
// Orquesta AuthService + SessionStore y devuelve a dónde navegar; la vista
// solo pinta mensajes y sigue la ruta.
// ============================================================================

use crate::models::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResendOtpRequest, ResetPasswordRequest,
    Role, Session, VerifyOtpRequest, VerifyResetOtpRequest,
};
use crate::services::api_client::ApiError;
use crate::services::auth_service::AuthService;
use crate::state::session_store::{SessionError, SessionStore};
use crate::viewmodels::action_dispatcher::{ConfirmPrompt, Confirmer};
use crate::viewmodels::navigation::Route;

const NOT_VERIFIED_CODE: &str = "account_not_verified";

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Authenticated { session: Session, redirect: Route },
    VerificationRequired { message: String, redirect: Route },
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Username missing. Please register again or follow the link from login.")]
    MissingUsername,
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
    #[error("Could not save your session: {0}")]
    Session(#[from] SessionError),
}

/// Página de inicio según el rol
pub fn home_for(role: &Role) -> Route {
    match role {
        Role::Admin => Route::AdminHome,
        Role::Staff => Route::StaffHome,
        _ => Route::Home,
    }
}

/// 403 de cuenta sin verificar: código estructurado o, en backends viejos, el texto
fn needs_verification(code: Option<&str>, message: &str) -> bool {
    if code == Some(NOT_VERIFIED_CODE) {
        return true;
    }
    let message = message.to_lowercase();
    message.contains("not verified") || message.contains("verify")
}

#[derive(Clone)]
pub struct SessionViewModel {
    auth: AuthService,
    store: SessionStore,
}

impl SessionViewModel {
    pub fn new(auth: AuthService, store: SessionStore) -> Self {
        Self { auth, store }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, FormError> {
        let request = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };

        match self.auth.login(&request).await {
            Ok(response) => {
                let session = self.store.set_session(response.token, response.user)?;
                let redirect = home_for(session.role());
                log::info!("✅ [LOGIN] {} → {}", session.user.username, redirect.path());
                Ok(LoginOutcome::Authenticated { session, redirect })
            }
            Err(ApiError::Forbidden { message, code }) if needs_verification(code.as_deref(), &message) => {
                log::warn!("📧 [LOGIN] Cuenta sin verificar: {}", request.username);
                Ok(LoginOutcome::VerificationRequired {
                    message: "Account not verified. Redirecting to verification page...".to_string(),
                    redirect: Route::Verify {
                        username: request.username,
                    },
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<Route, FormError> {
        self.auth.register(&request).await?;
        Ok(Route::Verify {
            username: request.username,
        })
    }

    pub async fn verify_otp(&self, username: &str, otp_code: &str) -> Result<Route, FormError> {
        let username = required_username(username)?;
        self.auth
            .verify_otp(&VerifyOtpRequest {
                username,
                otp_code: otp_code.trim().to_string(),
            })
            .await?;
        Ok(Route::Login)
    }

    /// Devuelve el mensaje del servidor ("OTP sent...")
    pub async fn resend_otp(&self, username: &str) -> Result<String, FormError> {
        let username = required_username(username)?;
        let response = self.auth.resend_otp(&ResendOtpRequest { username }).await?;
        Ok(response.message.unwrap_or_default())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Route, FormError> {
        let email = email.trim().to_string();
        self.auth
            .forgot_password(&ForgotPasswordRequest { email: email.clone() })
            .await?;
        Ok(Route::ResetPassword { email, sent: true })
    }

    pub async fn verify_reset_otp(&self, email: &str, otp_code: &str) -> Result<String, FormError> {
        let response = self
            .auth
            .verify_reset_otp(&VerifyResetOtpRequest {
                email: email.trim().to_string(),
                otp_code: otp_code.trim().to_string(),
            })
            .await?;
        Ok(response.message.unwrap_or_default())
    }

    /// La confirmación se valida antes de salir a la red
    pub async fn reset_password(
        &self,
        email: &str,
        otp_code: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<String, FormError> {
        if new_password != confirmation {
            return Err(FormError::PasswordMismatch);
        }
        let response = self
            .auth
            .reset_password(&ResetPasswordRequest {
                email: email.trim().to_string(),
                otp_code: otp_code.trim().to_string(),
                new_password: new_password.to_string(),
                new_password_confirmation: confirmation.to_string(),
            })
            .await?;
        Ok(response.message.unwrap_or_default())
    }

    /// Confirmar → POST /logout (best effort) → limpiar sesión local.
    /// `None` si el usuario se arrepiente.
    pub async fn logout(&self, confirmer: &dyn Confirmer) -> Option<Route> {
        if !confirmer.confirm(&ConfirmPrompt::logout()).await {
            return None;
        }
        if let Err(e) = self.auth.logout().await {
            log::warn!("⚠️ [LOGOUT] El servidor no confirmó el logout ({}), se cierra igual", e);
        }
        self.store.clear_session();
        Some(Route::Index)
    }
}

fn required_username(username: &str) -> Result<String, FormError> {
    let username = username.trim();
    if username.is_empty() {
        Err(FormError::MissingUsername)
    } else {
        Ok(username.to_string())
    }
}
