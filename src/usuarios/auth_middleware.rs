// src/usuarios/auth_middleware.rs

use actix_web::{dev::Payload, error::ErrorUnauthorized, web, FromRequest, HttpRequest};

use futures::future::{ready, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

// Importa as Claims e o papel do módulo de structs de usuário
use super::usuario_structs::{Claims, TipoUsuario};
use crate::shared::erros::ApiError;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Identidade autenticada extraída do JWT das requisições protegidas.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub email: String,
    pub tipo: TipoUsuario,
}

impl AuthenticatedUser {
    /// Listagem e mutação de pedidos são restritas à equipe da loja.
    pub fn exigir_vendedor_ou_admin(&self) -> Result<(), ApiError> {
        match self.tipo {
            TipoUsuario::Vendedor | TipoUsuario::Admin => Ok(()),
            TipoUsuario::Cliente => Err(ApiError::Proibido(
                "Acesso negado. Apenas vendedores e administradores podem executar esta ação"
                    .to_string(),
            )),
        }
    }

    /// Mutações de catálogo (produtos) são restritas a vendedores.
    pub fn exigir_vendedor(&self) -> Result<(), ApiError> {
        match self.tipo {
            TipoUsuario::Vendedor => Ok(()),
            _ => Err(ApiError::Proibido(
                "Acesso negado. Apenas vendedores podem executar esta ação".to_string(),
            )),
        }
    }

    pub fn eh_admin(&self) -> bool {
        self.tipo == TipoUsuario::Admin
    }
}

/// Extrator de autenticação para Actix Web.
/// Valida o token JWT presente no cabeçalho Authorization.
impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Acessa o AppState para obter a chave secreta JWT
        let app_state = req.app_data::<web::Data<AppState>>();

        let jwt_secret = match app_state {
            Some(state) => state.jwt_secret.clone(),
            None => {
                tracing::error!("AppState indisponível no extrator de autenticação");
                return ready(Err(ErrorUnauthorized("Erro de configuração do servidor.")));
            }
        };

        // Tenta obter o cabeçalho "Authorization"
        let auth_header = req.headers().get("Authorization");

        let token = match auth_header {
            Some(header_value) => {
                let header_str = match header_value.to_str() {
                    Ok(s) => s,
                    Err(_) => {
                        return ready(Err(ErrorUnauthorized("Token de autenticação inválido.")))
                    }
                };

                // Verifica se o cabeçalho começa com "Bearer "
                if header_str.starts_with("Bearer ") {
                    header_str.trim_start_matches("Bearer ").to_string()
                } else {
                    return ready(Err(ErrorUnauthorized(
                        "Formato de token inválido. Esperado 'Bearer <token>'.",
                    )));
                }
            }
            None => {
                return ready(Err(ErrorUnauthorized("Token de autenticação ausente.")));
            }
        };

        let validation = Validation::new(Algorithm::HS256);

        // Decodifica e valida o token
        let token_data = match decode::<Claims>(
            &token,
            &DecodingKey::from_secret(jwt_secret.as_ref()),
            &validation,
        ) {
            Ok(data) => data,
            Err(e) => {
                let error_message = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expirado.",
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        "Assinatura do token inválida."
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => "Token malformado.",
                    _ => "Token de autenticação inválido.",
                };
                tracing::warn!(erro = ?e, "token JWT rejeitado");
                return ready(Err(ErrorUnauthorized(error_message)));
            }
        };

        ready(Ok(AuthenticatedUser {
            id: token_data.claims.sub,
            email: token_data.claims.email,
            tipo: token_data.claims.tipo,
        }))
    }
}
