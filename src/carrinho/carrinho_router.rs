// src/carrinho/carrinho_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::{Pool, Postgres, Transaction};

use super::carrinho_structs::{
    AdicionaItem, AtualizaQuantidade, Carrinho, CarrinhoResponse, ItemCarrinho,
    ItemCarrinhoDetalhado,
};
use super::regras;
use crate::produtos::produtos_structs::Produto;
use crate::shared::erros::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::shared::validacoes;
use crate::usuarios::auth_middleware::AuthenticatedUser;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

const SQL_CARRINHO_POR_USUARIO: &str =
    "SELECT id, usuario_id, total FROM carrinhos WHERE usuario_id = $1";

// FOR UPDATE prende a linha do produto enquanto a linha do carrinho é decidida.
const SQL_PRODUTO_FOR_UPDATE: &str =
    "SELECT id, nome, descricao, preco, imagem, cor, tamanho, quantidade, quantidade_vendida, \
         em_promocao, preco_promocional, categoria_id \
     FROM produtos WHERE id = $1 FOR UPDATE";

const SQL_ITEM_DO_CARRINHO: &str =
    "SELECT id, carrinho_id, produto_id, quantidade, preco_unitario, subtotal \
     FROM itens_carrinho WHERE id = $1";

/// Busca o carrinho do usuário, criando um vazio na primeira utilização.
/// ON CONFLICT torna a criação preguiçosa idempotente mesmo com duas
/// requisições simultâneas do mesmo usuário.
async fn obter_ou_criar_carrinho(
    transaction: &mut Transaction<'_, Postgres>,
    usuario_id: i32,
) -> Result<Carrinho, ApiError> {
    sqlx::query("INSERT INTO carrinhos (usuario_id, total) VALUES ($1, 0) ON CONFLICT (usuario_id) DO NOTHING")
        .bind(usuario_id)
        .execute(&mut **transaction)
        .await?;

    let carrinho = sqlx::query_as::<_, Carrinho>(SQL_CARRINHO_POR_USUARIO)
        .bind(usuario_id)
        .fetch_one(&mut **transaction)
        .await?;
    Ok(carrinho)
}

/// Busca o carrinho existente do usuário; 404 quando nunca foi criado.
async fn carrinho_do_usuario(
    transaction: &mut Transaction<'_, Postgres>,
    usuario_id: i32,
) -> Result<Carrinho, ApiError> {
    sqlx::query_as::<_, Carrinho>(SQL_CARRINHO_POR_USUARIO)
        .bind(usuario_id)
        .fetch_optional(&mut **transaction)
        .await?
        .ok_or_else(|| ApiError::NaoEncontrado("Carrinho não encontrado".to_string()))
}

/// Recalcula o total em uma única instrução, mantendo o invariante
/// total == soma dos subtotais sem ler-modificar-escrever na aplicação.
async fn recalcular_total(
    transaction: &mut Transaction<'_, Postgres>,
    carrinho_id: i32,
) -> Result<(), ApiError> {
    sqlx::query(
        "UPDATE carrinhos SET total = \
             (SELECT COALESCE(SUM(subtotal), 0) FROM itens_carrinho WHERE carrinho_id = $1) \
         WHERE id = $1",
    )
    .bind(carrinho_id)
    .execute(&mut **transaction)
    .await?;
    Ok(())
}

/// Item do carrinho do chamador; 404 quando não existe, 403 quando pertence
/// a outro carrinho.
async fn item_do_proprio_carrinho(
    transaction: &mut Transaction<'_, Postgres>,
    carrinho: &Carrinho,
    item_id: i32,
) -> Result<ItemCarrinho, ApiError> {
    let item = sqlx::query_as::<_, ItemCarrinho>(SQL_ITEM_DO_CARRINHO)
        .bind(item_id)
        .fetch_optional(&mut **transaction)
        .await?
        .ok_or_else(|| ApiError::NaoEncontrado("Item não encontrado".to_string()))?;

    if item.carrinho_id != carrinho.id {
        return Err(ApiError::Proibido(
            "Este item não pertence ao seu carrinho".to_string(),
        ));
    }
    Ok(item)
}

/// Monta a resposta completa do carrinho do usuário.
async fn carregar_carrinho(
    pool: &Pool<Postgres>,
    usuario_id: i32,
) -> Result<CarrinhoResponse, ApiError> {
    let carrinho = sqlx::query_as::<_, Carrinho>(SQL_CARRINHO_POR_USUARIO)
        .bind(usuario_id)
        .fetch_one(pool)
        .await?;

    let itens = sqlx::query_as::<_, ItemCarrinhoDetalhado>(
        "SELECT ic.id, ic.produto_id, p.nome AS nome_produto, ic.quantidade, \
             ic.preco_unitario, ic.subtotal \
         FROM itens_carrinho ic \
         JOIN produtos p ON p.id = ic.produto_id \
         WHERE ic.carrinho_id = $1 ORDER BY ic.id",
    )
    .bind(carrinho.id)
    .fetch_all(pool)
    .await?;

    Ok(CarrinhoResponse {
        id: carrinho.id,
        usuario_id: carrinho.usuario_id,
        total: carrinho.total,
        itens,
    })
}

/// Rota para obter o carrinho do usuário autenticado, criando-o se preciso.
#[get("/carrinho")]
pub async fn obter_carrinho(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let mut transaction = data.db_pool.begin().await?;
    obter_ou_criar_carrinho(&mut transaction, usuario.id).await?;
    transaction.commit().await?;

    let resposta = carregar_carrinho(&data.db_pool, usuario.id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Carrinho do usuário", resposta)))
}

/// Rota para adicionar um produto ao carrinho do usuário autenticado.
///
/// Se o produto já está no carrinho as quantidades são fundidas e a linha é
/// reprecificada com o preço vigente; o total é recalculado na mesma
/// transação.
#[post("/carrinho/adicionar")]
pub async fn adicionar_item(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    corpo: web::Json<AdicionaItem>,
) -> Result<HttpResponse, ApiError> {
    let corpo = corpo.into_inner();

    // Rejeita a quantidade antes de qualquer consulta a produto ou estoque.
    if !validacoes::validar_quantidade(corpo.quantidade) {
        return Err(ApiError::Validacao(
            "Quantidade deve ser um número inteiro positivo".to_string(),
        ));
    }

    let mut transaction = data.db_pool.begin().await?;

    let produto = sqlx::query_as::<_, Produto>(SQL_PRODUTO_FOR_UPDATE)
        .bind(corpo.produto_id)
        .fetch_optional(&mut *transaction)
        .await?
        .ok_or_else(|| ApiError::NaoEncontrado("Produto não encontrado".to_string()))?;

    let carrinho = obter_ou_criar_carrinho(&mut transaction, usuario.id).await?;

    let existente = sqlx::query_as::<_, ItemCarrinho>(
        "SELECT id, carrinho_id, produto_id, quantidade, preco_unitario, subtotal \
         FROM itens_carrinho WHERE carrinho_id = $1 AND produto_id = $2",
    )
    .bind(carrinho.id)
    .bind(corpo.produto_id)
    .fetch_optional(&mut *transaction)
    .await?;

    let nova_quantidade = regras::quantidade_apos_adicao(existente.as_ref(), corpo.quantidade);
    regras::conferir_estoque(&produto, nova_quantidade)?;
    let (preco_unitario, subtotal) = regras::precificar_linha(&produto, nova_quantidade);

    match &existente {
        Some(item) => {
            sqlx::query(
                "UPDATE itens_carrinho SET quantidade = $1, preco_unitario = $2, subtotal = $3 \
                 WHERE id = $4",
            )
            .bind(nova_quantidade)
            .bind(&preco_unitario)
            .bind(&subtotal)
            .bind(item.id)
            .execute(&mut *transaction)
            .await?;
        }
        None => {
            sqlx::query(
                "INSERT INTO itens_carrinho (carrinho_id, produto_id, quantidade, preco_unitario, subtotal) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(carrinho.id)
            .bind(corpo.produto_id)
            .bind(nova_quantidade)
            .bind(&preco_unitario)
            .bind(&subtotal)
            .execute(&mut *transaction)
            .await?;
        }
    }

    recalcular_total(&mut transaction, carrinho.id).await?;
    transaction.commit().await?;

    let resposta = carregar_carrinho(&data.db_pool, usuario.id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Produto adicionado ao carrinho com sucesso",
        resposta,
    )))
}

/// Rota para atualizar a quantidade absoluta de um item do carrinho.
#[put("/carrinho/itens/{item_id}")]
pub async fn atualizar_quantidade(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    corpo: web::Json<AtualizaQuantidade>,
) -> Result<HttpResponse, ApiError> {
    let item_id = path.into_inner();

    if !validacoes::validar_quantidade(corpo.quantidade) {
        return Err(ApiError::Validacao(
            "Quantidade deve ser um número inteiro positivo".to_string(),
        ));
    }

    let mut transaction = data.db_pool.begin().await?;

    let carrinho = carrinho_do_usuario(&mut transaction, usuario.id).await?;
    let item = item_do_proprio_carrinho(&mut transaction, &carrinho, item_id).await?;

    let produto = sqlx::query_as::<_, Produto>(SQL_PRODUTO_FOR_UPDATE)
        .bind(item.produto_id)
        .fetch_optional(&mut *transaction)
        .await?
        .ok_or_else(|| ApiError::NaoEncontrado("Produto não encontrado".to_string()))?;

    // A quantidade é absoluta: confere o estoque contra ela, não contra a soma.
    regras::conferir_estoque(&produto, corpo.quantidade)?;
    let (preco_unitario, subtotal) = regras::precificar_linha(&produto, corpo.quantidade);

    sqlx::query(
        "UPDATE itens_carrinho SET quantidade = $1, preco_unitario = $2, subtotal = $3 WHERE id = $4",
    )
    .bind(corpo.quantidade)
    .bind(&preco_unitario)
    .bind(&subtotal)
    .bind(item.id)
    .execute(&mut *transaction)
    .await?;

    recalcular_total(&mut transaction, carrinho.id).await?;
    transaction.commit().await?;

    let resposta = carregar_carrinho(&data.db_pool, usuario.id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Quantidade atualizada com sucesso",
        resposta,
    )))
}

/// Rota para remover um item do carrinho.
#[delete("/carrinho/itens/{item_id}")]
pub async fn remover_item(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let item_id = path.into_inner();

    let mut transaction = data.db_pool.begin().await?;

    let carrinho = carrinho_do_usuario(&mut transaction, usuario.id).await?;
    let item = item_do_proprio_carrinho(&mut transaction, &carrinho, item_id).await?;

    sqlx::query("DELETE FROM itens_carrinho WHERE id = $1")
        .bind(item.id)
        .execute(&mut *transaction)
        .await?;

    recalcular_total(&mut transaction, carrinho.id).await?;
    transaction.commit().await?;

    let resposta = carregar_carrinho(&data.db_pool, usuario.id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Produto removido do carrinho com sucesso",
        resposta,
    )))
}

/// Rota para esvaziar o carrinho, zerando o total.
#[delete("/carrinho/limpar")]
pub async fn limpar_carrinho(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let mut transaction = data.db_pool.begin().await?;

    let carrinho = carrinho_do_usuario(&mut transaction, usuario.id).await?;

    sqlx::query("DELETE FROM itens_carrinho WHERE carrinho_id = $1")
        .bind(carrinho.id)
        .execute(&mut *transaction)
        .await?;
    sqlx::query("UPDATE carrinhos SET total = 0 WHERE id = $1")
        .bind(carrinho.id)
        .execute(&mut *transaction)
        .await?;

    transaction.commit().await?;

    let resposta = carregar_carrinho(&data.db_pool, usuario.id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Carrinho limpo com sucesso", resposta)))
}
