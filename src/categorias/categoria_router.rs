// src/categorias/categoria_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::query_as;

// Importa as structs de categoria
use super::categoria_structs::{Categoria, NovaCategoria};
use crate::shared::erros::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::shared::validacoes;
use crate::usuarios::auth_middleware::AuthenticatedUser;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Rota para listar todas as categorias.
#[get("/categorias")]
pub async fn listar_categorias(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let categorias = query_as::<_, Categoria>("SELECT id, nome FROM categorias ORDER BY id")
        .fetch_all(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Categorias listadas com sucesso",
        categorias,
    )))
}

/// Rota para buscar uma categoria por ID.
#[get("/categorias/{id}")]
pub async fn obter_categoria_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let categoria = query_as::<_, Categoria>("SELECT id, nome FROM categorias WHERE id = $1")
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| ApiError::NaoEncontrado("Categoria não encontrada".to_string()))?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Categoria com ID {} encontrada", id),
        categoria,
    )))
}

/// Rota para cadastrar uma nova categoria (vendedor ou admin).
#[post("/categorias")]
pub async fn cadastrar_categoria(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    item: web::Json<NovaCategoria>,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_vendedor_ou_admin()?;

    if !validacoes::validar_nome(&item.nome) {
        return Err(ApiError::Validacao(
            "Nome da categoria deve ter pelo menos 3 caracteres".to_string(),
        ));
    }

    let categoria =
        query_as::<_, Categoria>("INSERT INTO categorias (nome) VALUES ($1) RETURNING id, nome")
            .bind(&item.nome)
            .fetch_one(&data.db_pool)
            .await?;

    Ok(HttpResponse::Created().json(GenericResponse::sucesso(
        "Categoria criada com sucesso",
        categoria,
    )))
}

/// Rota para atualizar uma categoria existente (vendedor ou admin).
#[put("/categorias/{id}")]
pub async fn atualizar_categoria(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<NovaCategoria>,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_vendedor_ou_admin()?;
    let id = path.into_inner();

    if !validacoes::validar_nome(&item.nome) {
        return Err(ApiError::Validacao(
            "Nome da categoria deve ter pelo menos 3 caracteres".to_string(),
        ));
    }

    let categoria = query_as::<_, Categoria>(
        "UPDATE categorias SET nome = $1 WHERE id = $2 RETURNING id, nome",
    )
    .bind(&item.nome)
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Categoria não encontrada".to_string()))?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Categoria atualizada com sucesso",
        categoria,
    )))
}

/// Rota para deletar uma categoria (vendedor ou admin).
#[delete("/categorias/{id}")]
pub async fn deletar_categoria(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_vendedor_ou_admin()?;
    let id = path.into_inner();

    let resultado = sqlx::query("DELETE FROM categorias WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado("Categoria não encontrada".to_string()));
    }

    Ok(HttpResponse::Ok().json(GenericResponse::mensagem("Categoria deletada com sucesso")))
}
