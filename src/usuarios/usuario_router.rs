// src/usuarios/usuario_router.rs

use actix_web::{post, web, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST}; // Para hashing de senhas
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::{query, query_as, Row};

// Importa as structs do módulo de usuários
use super::auth_middleware::AuthenticatedUser;
use super::usuario_structs::{
    AuthResponse, Claims, LoginRequest, NovoUsuario, TipoUsuario, Usuario, UsuarioResponse,
};
use crate::shared::erros::ApiError;
use crate::shared::validacoes;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

const COLUNAS_USUARIO: &str = "id, nome, email, senha_hash, tipo, telefone";

/// Gera o JWT do usuário, válido por 7 dias.
fn gerar_token(segredo: &str, id: i32, email: &str, tipo: TipoUsuario) -> Result<String, ApiError> {
    let expiracao = Utc::now() + Duration::days(7);
    let claims = Claims {
        sub: id,
        email: email.to_string(),
        tipo,
        exp: expiracao.timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(segredo.as_ref()),
    )?;
    Ok(token)
}

/// Rota para cadastrar um novo usuário.
///
/// Qualquer visitante cria conta de cliente; conta de vendedor só pode ser
/// criada por um admin autenticado, e admin nunca nasce por esta rota.
#[post("/auth/registro")]
pub async fn registrar_usuario(
    data: web::Data<AppState>,
    chamador: Option<AuthenticatedUser>,
    novo_usuario: web::Json<NovoUsuario>,
) -> Result<HttpResponse, ApiError> {
    let novo_usuario = novo_usuario.into_inner();

    if !validacoes::validar_nome(&novo_usuario.nome) {
        return Err(ApiError::Validacao(
            "Nome deve ter pelo menos 3 caracteres".to_string(),
        ));
    }
    if !validacoes::validar_email(&novo_usuario.email) {
        return Err(ApiError::Validacao("Email inválido".to_string()));
    }
    if novo_usuario.senha.len() < 6 {
        return Err(ApiError::Validacao(
            "Senha deve ter pelo menos 6 caracteres".to_string(),
        ));
    }

    let tipo = match novo_usuario.tipo {
        Some(TipoUsuario::Vendedor) => {
            let autorizado = chamador.as_ref().map(AuthenticatedUser::eh_admin).unwrap_or(false);
            if !autorizado {
                return Err(ApiError::Proibido(
                    "Apenas o administrador principal pode criar contas de vendedor".to_string(),
                ));
            }
            TipoUsuario::Vendedor
        }
        // Pedido de admin ou ausência de tipo viram cliente comum.
        _ => TipoUsuario::Cliente,
    };

    // Verifica se o e-mail já está em uso
    let existente = query_as::<_, Usuario>(&format!(
        "SELECT {} FROM usuarios WHERE email = $1",
        COLUNAS_USUARIO
    ))
    .bind(&novo_usuario.email)
    .fetch_optional(&data.db_pool)
    .await?;

    if existente.is_some() {
        return Err(ApiError::Conflito("Email já cadastrado".to_string()));
    }

    let senha_hash = hash(&novo_usuario.senha, DEFAULT_COST)?;

    let row = query(
        "INSERT INTO usuarios (nome, email, senha_hash, tipo, telefone) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&novo_usuario.nome)
    .bind(&novo_usuario.email)
    .bind(&senha_hash)
    .bind(tipo.as_str())
    .bind(&novo_usuario.telefone)
    .fetch_one(&data.db_pool)
    .await?;
    let id: i32 = row.try_get("id")?;

    let token = gerar_token(&data.jwt_secret, id, &novo_usuario.email, tipo)?;

    tracing::info!(id, tipo = tipo.as_str(), "usuário cadastrado");

    Ok(HttpResponse::Created().json(AuthResponse {
        status: "success".to_string(),
        message: "Usuário criado com sucesso".to_string(),
        token,
        usuario: UsuarioResponse {
            id,
            nome: novo_usuario.nome,
            email: novo_usuario.email,
            tipo: tipo.as_str().to_string(),
            telefone: novo_usuario.telefone,
        },
    }))
}

/// Rota para login de usuário.
#[post("/auth/login")]
pub async fn login_usuario(
    data: web::Data<AppState>,
    login_request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    // Busca o usuário pelo e-mail
    let usuario = query_as::<_, Usuario>(&format!(
        "SELECT {} FROM usuarios WHERE email = $1",
        COLUNAS_USUARIO
    ))
    .bind(&login_request.email)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or(ApiError::CredenciaisInvalidas)?;

    // Verifica a senha
    if !verify(&login_request.senha, &usuario.senha_hash)? {
        return Err(ApiError::CredenciaisInvalidas);
    }

    let tipo = TipoUsuario::parse(&usuario.tipo)
        .ok_or_else(|| ApiError::Interno(format!("tipo de usuário desconhecido: {}", usuario.tipo)))?;

    let token = gerar_token(&data.jwt_secret, usuario.id, &usuario.email, tipo)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        status: "success".to_string(),
        message: "Login bem-sucedido!".to_string(),
        token,
        usuario: UsuarioResponse::from(usuario),
    }))
}
