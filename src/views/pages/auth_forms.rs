// ============================================================================
// AUTH FORMS - login, registro, OTP y recuperación de contraseña
// ============================================================================
// Cada formulario se engancha solo si existe en la página. Los errores se
// muestran en el alert del formulario; nada de esto redirige al fallar.
// ============================================================================

use gloo_timers::callback::Timeout;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::dom::{
    add_class, field_value, get_element_by_id, on_click, on_submit, query_param, remove_class,
    set_disabled, set_field_value, set_text_content, set_visible,
};
use crate::models::RegisterRequest;
use crate::services::AuthService;
use crate::viewmodels::navigation::Route;
use crate::viewmodels::session_viewmodel::{FormError, LoginOutcome};
use crate::viewmodels::SessionViewModel;
use crate::views::notifications::alert;

const ALERT_TONES: [&str; 4] = ["alert-danger", "alert-success", "alert-warning", "alert-info"];
const UNVERIFIED_REDIRECT_MS: u32 = 1500;
const RESEND_NOTICE_MS: u32 = 5000;

/// Muestra el alert del formulario con un tono (`danger`, `success`...)
fn show_alert(id: &str, message: &str, tone: &str) {
    let Some(element) = get_element_by_id(id) else {
        log::warn!("⚠️ [AUTH] #{} no existe: {}", id, message);
        return;
    };
    let result = ALERT_TONES
        .iter()
        .try_for_each(|class| remove_class(&element, class))
        .and_then(|_| add_class(&element, &format!("alert-{}", tone)))
        .and_then(|_| set_visible(&element, true));
    if let Err(e) = result {
        log::warn!("⚠️ [AUTH] No se pudo mostrar #{}: {:?}", id, e);
    }
    set_text_content(&element, message);
}

fn hide_alert(id: &str) {
    if let Some(element) = get_element_by_id(id) {
        let _ = set_visible(&element, false);
    }
}

fn form_error(id: &str, error: &FormError) {
    show_alert(id, &error.to_string(), "danger");
}

pub fn mount(ctx: &AppContext) -> Result<(), JsValue> {
    let vm = Rc::new(SessionViewModel::new(AuthService::new(ctx.api.clone()), ctx.store.clone()));
    bind_login(ctx, &vm)?;
    bind_register(ctx, &vm)?;
    bind_verify(ctx, &vm)?;
    bind_forgot(ctx, &vm)?;
    bind_reset(ctx, &vm)?;
    Ok(())
}

fn bind_login(ctx: &AppContext, vm: &Rc<SessionViewModel>) -> Result<(), JsValue> {
    let Some(form) = get_element_by_id("login-form") else {
        return Ok(());
    };
    let (ctx, vm) = (ctx.clone(), vm.clone());
    on_submit(&form, move || {
        let (ctx, vm) = (ctx.clone(), vm.clone());
        let username = field_value("username");
        let password = field_value("password");
        hide_alert("login-alert");
        spawn_local(async move {
            match vm.login(&username, &password).await {
                Ok(LoginOutcome::Authenticated { redirect, .. }) => ctx.go(&redirect),
                Ok(LoginOutcome::VerificationRequired { message, redirect }) => {
                    show_alert("login-alert", &message, "warning");
                    Timeout::new(UNVERIFIED_REDIRECT_MS, move || ctx.go(&redirect)).forget();
                }
                Err(e) => form_error("login-alert", &e),
            }
        });
    })
}

fn bind_register(ctx: &AppContext, vm: &Rc<SessionViewModel>) -> Result<(), JsValue> {
    let Some(form) = get_element_by_id("register-form") else {
        return Ok(());
    };
    let (ctx, vm) = (ctx.clone(), vm.clone());
    on_submit(&form, move || {
        let (ctx, vm) = (ctx.clone(), vm.clone());
        let request = RegisterRequest {
            full_name: field_value("full_name"),
            username: field_value("username").trim().to_string(),
            email: field_value("email"),
            password: field_value("password"),
        };
        hide_alert("register-alert");
        spawn_local(async move {
            match vm.register(request).await {
                Ok(route) => {
                    alert("Registration Successful! Please check your email for the verification code.");
                    ctx.go(&route);
                }
                Err(e) => form_error("register-alert", &e),
            }
        });
    })
}

fn bind_verify(ctx: &AppContext, vm: &Rc<SessionViewModel>) -> Result<(), JsValue> {
    let Some(form) = get_element_by_id("verify-form") else {
        return Ok(());
    };
    if let Some(username) = query_param("username") {
        set_field_value("verify-username", &username);
    }

    {
        let (ctx, vm) = (ctx.clone(), vm.clone());
        on_submit(&form, move || {
            let (ctx, vm) = (ctx.clone(), vm.clone());
            let username = field_value("verify-username");
            let otp_code = field_value("otp_code");
            spawn_local(async move {
                match vm.verify_otp(&username, &otp_code).await {
                    Ok(route) => {
                        alert("Verification Successful! You can now login.");
                        ctx.go(&route);
                    }
                    Err(e) => form_error("verify-alert", &e),
                }
            });
        })?;
    }

    let Some(button) = get_element_by_id("resend-otp-btn") else {
        return Ok(());
    };
    let vm = vm.clone();
    let resend = button.clone();
    on_click(&button, move |event| {
        event.prevent_default();
        let (vm, button) = (vm.clone(), resend.clone());
        let username = field_value("verify-username");
        let _ = set_disabled(&button, true);
        spawn_local(async move {
            match vm.resend_otp(&username).await {
                Ok(message) => {
                    show_alert("verify-alert", &message, "success");
                    Timeout::new(RESEND_NOTICE_MS, || hide_alert("verify-alert")).forget();
                }
                Err(e) => form_error("verify-alert", &e),
            }
            let _ = set_disabled(&button, false);
        });
    })
}

fn bind_forgot(ctx: &AppContext, vm: &Rc<SessionViewModel>) -> Result<(), JsValue> {
    let Some(form) = get_element_by_id("forgot-password-form") else {
        return Ok(());
    };
    let (ctx, vm) = (ctx.clone(), vm.clone());
    on_submit(&form, move || {
        let (ctx, vm) = (ctx.clone(), vm.clone());
        let email = field_value("forgot-email");
        hide_alert("forgot-alert");
        spawn_local(async move {
            match vm.forgot_password(&email).await {
                Ok(route) => ctx.go(&route),
                Err(e) => form_error("forgot-alert", &e),
            }
        });
    })
}

/// Dos pasos: verificar el código y luego fijar la contraseña nueva
fn bind_reset(ctx: &AppContext, vm: &Rc<SessionViewModel>) -> Result<(), JsValue> {
    let Some(verify_form) = get_element_by_id("verify-otp-form") else {
        return Ok(());
    };
    if let Some(email) = query_param("email") {
        set_field_value("reset-email", &email);
    }
    if query_param("sent").as_deref() == Some("true") {
        show_alert("reset-alert", "A reset code has been sent to your email.", "info");
    }

    {
        let vm = vm.clone();
        let step_one = verify_form.clone();
        on_submit(&verify_form, move || {
            let (vm, step_one) = (vm.clone(), step_one.clone());
            let email = field_value("reset-email");
            let otp_code = field_value("otp_code");
            hide_alert("reset-alert");
            spawn_local(async move {
                match vm.verify_reset_otp(&email, &otp_code).await {
                    Ok(message) => {
                        show_alert("reset-alert", &message, "success");
                        let _ = set_visible(&step_one, false);
                        if let Some(step_two) = get_element_by_id("reset-password-form") {
                            let _ = set_visible(&step_two, true);
                        }
                    }
                    Err(e) => form_error("reset-alert", &e),
                }
            });
        })?;
    }

    let Some(reset_form) = get_element_by_id("reset-password-form") else {
        return Ok(());
    };
    let (ctx, vm) = (ctx.clone(), vm.clone());
    on_submit(&reset_form, move || {
        let (ctx, vm) = (ctx.clone(), vm.clone());
        let email = field_value("reset-email");
        let otp_code = field_value("otp_code");
        let password = field_value("new_password");
        let confirmation = field_value("new_password_confirmation");
        hide_alert("reset-alert");
        spawn_local(async move {
            match vm.reset_password(&email, &otp_code, &password, &confirmation).await {
                Ok(message) => {
                    alert(&message);
                    ctx.go(&Route::Login);
                }
                Err(e) => form_error("reset-alert", &e),
            }
        });
    })
}
