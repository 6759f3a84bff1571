// src/usuarios/admin.rs
//! Bootstrap do administrador principal a partir de variáveis de ambiente.

use bcrypt::{hash, DEFAULT_COST};
use sqlx::{Pool, Postgres};

use super::usuario_structs::Usuario;
use crate::shared::erros::ApiError;

/// Garante a existência do administrador principal na subida do servidor.
///
/// Lê ADMIN_EMAIL e ADMIN_SENHA (e ADMIN_NOME, opcional); sem elas o passo é
/// pulado com aviso. Falhas são logadas e nunca derrubam a aplicação.
pub async fn criar_admin_principal(pool: &Pool<Postgres>) {
    let credenciais = (
        std::env::var("ADMIN_EMAIL").ok(),
        std::env::var("ADMIN_SENHA").ok(),
    );
    let (email, senha) = match credenciais {
        (Some(email), Some(senha)) => (email, senha),
        _ => {
            tracing::warn!(
                "ADMIN_EMAIL e ADMIN_SENHA não definidas; administrador principal não será criado"
            );
            return;
        }
    };
    let nome =
        std::env::var("ADMIN_NOME").unwrap_or_else(|_| "Administrador Principal".to_string());

    if let Err(erro) = garantir_admin(pool, &email, &senha, &nome).await {
        tracing::error!(?erro, "erro ao criar administrador principal");
    }
}

async fn garantir_admin(
    pool: &Pool<Postgres>,
    email: &str,
    senha: &str,
    nome: &str,
) -> Result<(), ApiError> {
    let existente = sqlx::query_as::<_, Usuario>(
        "SELECT id, nome, email, senha_hash, tipo, telefone FROM usuarios WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    if let Some(usuario) = existente {
        if usuario.tipo != "admin" {
            // Conta já cadastrada com outro papel é promovida.
            sqlx::query("UPDATE usuarios SET tipo = 'admin' WHERE id = $1")
                .bind(usuario.id)
                .execute(pool)
                .await?;
            tracing::info!(email, "usuário existente promovido a administrador principal");
        } else {
            tracing::info!(email, "administrador principal já existe");
        }
        return Ok(());
    }

    let senha_hash = hash(senha, DEFAULT_COST)?;
    sqlx::query("INSERT INTO usuarios (nome, email, senha_hash, tipo) VALUES ($1, $2, $3, 'admin')")
        .bind(nome)
        .bind(email)
        .bind(&senha_hash)
        .execute(pool)
        .await?;

    tracing::info!(email, "administrador principal criado");
    Ok(())
}
