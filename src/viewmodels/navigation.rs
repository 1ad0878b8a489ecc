// Rutas entre páginas del sitio (relativas a la raíz)

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    Login,
    Home,
    AdminHome,
    StaffHome,
    Verify { username: String },
    ResetPassword { email: String, sent: bool },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Index => "index.html".to_string(),
            Route::Login => "login.html".to_string(),
            Route::Home => "home.html".to_string(),
            Route::AdminHome => "admin/index.html".to_string(),
            Route::StaffHome => "staff/index.html".to_string(),
            Route::Verify { username } => format!("verify.html?username={}", urlencoding::encode(username)),
            Route::ResetPassword { email, sent } => {
                let mut path = format!("reset-password.html?email={}", urlencoding::encode(email));
                if *sent {
                    path.push_str("&sent=true");
                }
                path
            }
        }
    }
}

/// Cambio de página (window.location en el navegador)
pub trait Navigator {
    fn go(&self, route: &Route);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_values_are_encoded() {
        let verify = Route::Verify {
            username: "ana maría".to_string(),
        };
        assert_eq!(verify.path(), "verify.html?username=ana%20mar%C3%ADa");

        let reset = Route::ResetPassword {
            email: "a+b@x.io".to_string(),
            sent: true,
        };
        assert_eq!(reset.path(), "reset-password.html?email=a%2Bb%40x.io&sent=true");
    }
}
