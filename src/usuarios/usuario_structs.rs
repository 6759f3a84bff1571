// src/usuarios/usuario_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Papéis de usuário reconhecidos pela API.
///
/// `admin` nunca nasce pela rota de cadastro: só existe via bootstrap de
/// ambiente (ver `usuarios::admin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoUsuario {
    Cliente,
    Vendedor,
    Admin,
}

impl TipoUsuario {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoUsuario::Cliente => "cliente",
            TipoUsuario::Vendedor => "vendedor",
            TipoUsuario::Admin => "admin",
        }
    }

    pub fn parse(valor: &str) -> Option<TipoUsuario> {
        match valor {
            "cliente" => Some(TipoUsuario::Cliente),
            "vendedor" => Some(TipoUsuario::Vendedor),
            "admin" => Some(TipoUsuario::Admin),
            _ => None,
        }
    }
}

/// Usuário como armazenado no banco. A senha fica apenas como hash.
#[derive(FromRow)]
pub struct Usuario {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub senha_hash: String,
    pub tipo: String,
    pub telefone: Option<String>,
}

/// Dados públicos de um usuário, devolvidos no cadastro e no login.
#[derive(Serialize)]
pub struct UsuarioResponse {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub tipo: String,
    pub telefone: Option<String>,
}

impl From<Usuario> for UsuarioResponse {
    fn from(usuario: Usuario) -> Self {
        UsuarioResponse {
            id: usuario.id,
            nome: usuario.nome,
            email: usuario.email,
            tipo: usuario.tipo,
            telefone: usuario.telefone,
        }
    }
}

/// Corpo da requisição de cadastro.
#[derive(Deserialize)]
pub struct NovoUsuario {
    pub nome: String,
    pub email: String,
    pub senha: String, // Senha em texto claro (vira hash antes de salvar)
    pub tipo: Option<TipoUsuario>,
    pub telefone: Option<String>,
}

/// Corpo da requisição de login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

/// Payload do JWT (Claims).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // ID do usuário
    pub email: String,
    pub tipo: TipoUsuario,
    pub exp: i64, // Expiração (timestamp Unix)
}

/// Resposta de sucesso do cadastro e do login, com o token JWT.
#[derive(Serialize)]
pub struct AuthResponse {
    pub status: String,
    pub message: String,
    pub token: String,
    pub usuario: UsuarioResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tipo_usuario_parse_e_as_str_sao_inversos() {
        for tipo in [TipoUsuario::Cliente, TipoUsuario::Vendedor, TipoUsuario::Admin] {
            assert_eq!(TipoUsuario::parse(tipo.as_str()), Some(tipo));
        }
        assert_eq!(TipoUsuario::parse("gerente"), None);
    }
}
