// ============================================================================
// AUTH SERVICE - Endpoints de cuenta (login, registro, OTP, contraseña)
// ============================================================================
// Solo HTTP: la sesión y las redirecciones las maneja SessionViewModel
// ============================================================================

use crate::models::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    ResendOtpRequest, ResetPasswordRequest, VerifyOtpRequest, VerifyResetOtpRequest,
};
use crate::services::api_client::{ApiClient, ApiError, RequestOptions};
use crate::services::http::{Method, RequestBody};

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

/// Requests anónimos: un 401 aquí no es "sesión expirada"
fn anonymous(fallback: &str) -> RequestOptions {
    RequestOptions::fallback(fallback).skipping_auth_redirect()
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        log::info!("🔐 [AUTH] Login de {}", request.username);
        self.api
            .send_json(Method::Post, "login", request, &anonymous("Login failed"))
            .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ApiError> {
        log::info!("📝 [AUTH] Registro de {}", request.username);
        self.api
            .send_json(Method::Post, "register", request, &anonymous("Registration failed"))
            .await
    }

    pub async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<MessageResponse, ApiError> {
        self.api
            .send_json(Method::Post, "verify-otp", request, &anonymous("Verification failed"))
            .await
    }

    pub async fn resend_otp(&self, request: &ResendOtpRequest) -> Result<MessageResponse, ApiError> {
        self.api
            .send_json(Method::Post, "resend-otp", request, &anonymous("Failed to resend OTP"))
            .await
    }

    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<MessageResponse, ApiError> {
        self.api
            .send_json(Method::Post, "forgot-password", request, &anonymous("Failed to send reset code."))
            .await
    }

    pub async fn verify_reset_otp(&self, request: &VerifyResetOtpRequest) -> Result<MessageResponse, ApiError> {
        self.api
            .send_json(Method::Post, "verify-reset-otp", request, &anonymous("Verification failed."))
            .await
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<MessageResponse, ApiError> {
        self.api
            .send_json(Method::Post, "reset-password", request, &anonymous("Reset failed."))
            .await
    }

    /// Invalida el token en el servidor
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.api
            .request(Method::Post, "logout", RequestBody::Empty, &anonymous("Logout failed"))
            .await
            .map(|_| ())
    }
}
