// src/pedidos/pedido_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::{Pool, Postgres, Transaction};

use super::pedido_structs::{
    AtualizaStatus, FiltroStatus, ItemPedido, NovoPedido, Pedido, PedidoResponse,
};
use super::regras::{self, StatusPedido};
use crate::carrinho::carrinho_structs::{Carrinho, ItemCarrinho};
use crate::shared::erros::{eh_violacao_unicidade, ApiError};
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

const COLUNAS_PEDIDO: &str =
    "id, numero_pedido, nome_cliente, email_cliente, telefone_cliente, total, status, created_at";

const COLUNAS_ITEM_PEDIDO: &str =
    "id, pedido_id, produto_id, quantidade, preco_unitario, subtotal";

/// Quantas vezes o fechamento tenta um número de pedido novo após colisão.
const MAX_TENTATIVAS_NUMERO: u32 = 3;

async fn itens_do_pedido(
    pool: &Pool<Postgres>,
    pedido_id: i32,
) -> Result<Vec<ItemPedido>, ApiError> {
    let itens = sqlx::query_as::<_, ItemPedido>(&format!(
        "SELECT {} FROM itens_pedido WHERE pedido_id = $1 ORDER BY id",
        COLUNAS_ITEM_PEDIDO
    ))
    .bind(pedido_id)
    .fetch_all(pool)
    .await?;
    Ok(itens)
}

/// Débito condicional do estoque: a mesma instrução confere e decrementa,
/// de modo que a última unidade não pode ser vendida duas vezes mesmo com
/// dois fechamentos simultâneos.
async fn debitar_estoque(
    transaction: &mut Transaction<'_, Postgres>,
    produto_id: i32,
    quantidade: i32,
) -> Result<(), ApiError> {
    let resultado = sqlx::query(
        "UPDATE produtos \
         SET quantidade = quantidade - $1, quantidade_vendida = quantidade_vendida + $1 \
         WHERE id = $2 AND quantidade >= $1",
    )
    .bind(quantidade)
    .bind(produto_id)
    .execute(&mut **transaction)
    .await?;

    if resultado.rows_affected() == 0 {
        // Distingue produto removido de estoque que acabou entre a adição ao
        // carrinho e o fechamento. O erro desfaz a transação inteira: nenhuma
        // linha fica debitada pela metade.
        let existe = sqlx::query("SELECT id FROM produtos WHERE id = $1")
            .bind(produto_id)
            .fetch_optional(&mut **transaction)
            .await?;
        return match existe {
            Some(_) => Err(ApiError::EstoqueInsuficiente(format!(
                "Estoque insuficiente para o produto com ID {}",
                produto_id
            ))),
            None => Err(ApiError::NaoEncontrado(format!(
                "Produto com ID {} não encontrado",
                produto_id
            ))),
        };
    }
    Ok(())
}

/// Crédito de estoque no cancelamento: devolve a quantidade ao estoque e
/// desconta do acumulado de vendas.
async fn creditar_estoque(
    transaction: &mut Transaction<'_, Postgres>,
    produto_id: i32,
    quantidade: i32,
) -> Result<(), ApiError> {
    let resultado = sqlx::query(
        "UPDATE produtos \
         SET quantidade = quantidade + $1, quantidade_vendida = quantidade_vendida - $1 \
         WHERE id = $2",
    )
    .bind(quantidade)
    .bind(produto_id)
    .execute(&mut **transaction)
    .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(format!(
            "Produto com ID {} não encontrado",
            produto_id
        )));
    }
    Ok(())
}

/// Fecha o pedido do carrinho em uma única transação: snapshot das linhas,
/// débito de estoque e limpeza do carrinho, ou nada em caso de falha.
async fn fechar_pedido(
    pool: &Pool<Postgres>,
    corpo: &NovoPedido,
) -> Result<PedidoResponse, ApiError> {
    let mut transaction = pool.begin().await?;

    // Carrinho do cliente, preso até o fim do fechamento.
    let carrinho = sqlx::query_as::<_, Carrinho>(
        "SELECT id, usuario_id, total FROM carrinhos WHERE usuario_id = $1 FOR UPDATE",
    )
    .bind(corpo.cliente_id)
    .fetch_optional(&mut *transaction)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Carrinho não encontrado".to_string()))?;

    let itens_carrinho = sqlx::query_as::<_, ItemCarrinho>(
        "SELECT id, carrinho_id, produto_id, quantidade, preco_unitario, subtotal \
         FROM itens_carrinho WHERE carrinho_id = $1 ORDER BY id",
    )
    .bind(carrinho.id)
    .fetch_all(&mut *transaction)
    .await?;

    if itens_carrinho.is_empty() {
        return Err(ApiError::CarrinhoVazio);
    }

    let numero_pedido = regras::gerar_numero_pedido();
    let snapshot = regras::montar_itens_pedido(&itens_carrinho);

    let pedido = sqlx::query_as::<_, Pedido>(&format!(
        "INSERT INTO pedidos (numero_pedido, nome_cliente, email_cliente, telefone_cliente, total, status) \
         VALUES ($1, $2, $3, $4, $5, 'pendente') RETURNING {}",
        COLUNAS_PEDIDO
    ))
    .bind(&numero_pedido)
    .bind(&corpo.nome_cliente)
    .bind(&corpo.email_cliente)
    .bind(&corpo.telefone_cliente)
    .bind(&carrinho.total)
    .fetch_one(&mut *transaction)
    .await?;

    let mut itens_pedido = Vec::with_capacity(snapshot.len());
    for item in &snapshot {
        let inserido = sqlx::query_as::<_, ItemPedido>(&format!(
            "INSERT INTO itens_pedido (pedido_id, produto_id, quantidade, preco_unitario, subtotal) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COLUNAS_ITEM_PEDIDO
        ))
        .bind(pedido.id)
        .bind(item.produto_id)
        .bind(item.quantidade)
        .bind(&item.preco_unitario)
        .bind(&item.subtotal)
        .fetch_one(&mut *transaction)
        .await?;
        itens_pedido.push(inserido);

        debitar_estoque(&mut transaction, item.produto_id, item.quantidade).await?;
    }

    // Esvazia o carrinho e zera o total dentro da mesma transação.
    sqlx::query("DELETE FROM itens_carrinho WHERE carrinho_id = $1")
        .bind(carrinho.id)
        .execute(&mut *transaction)
        .await?;
    sqlx::query("UPDATE carrinhos SET total = 0 WHERE id = $1")
        .bind(carrinho.id)
        .execute(&mut *transaction)
        .await?;

    transaction.commit().await?;

    Ok(PedidoResponse {
        pedido,
        itens: itens_pedido,
    })
}

/// Rota para criar um pedido a partir do carrinho do cliente.
#[post("/pedidos")]
pub async fn criar_pedido(
    data: web::Data<AppState>,
    corpo: web::Json<NovoPedido>,
) -> Result<HttpResponse, ApiError> {
    let corpo = corpo.into_inner();
    regras::validar_contato(&corpo.nome_cliente, &corpo.email_cliente, &corpo.telefone_cliente)?;

    // Colisão no número do pedido reinicia a transação com um número novo.
    let mut tentativas = 0;
    let resposta = loop {
        tentativas += 1;
        match fechar_pedido(&data.db_pool, &corpo).await {
            Ok(resposta) => break resposta,
            Err(ApiError::Banco(erro))
                if eh_violacao_unicidade(&erro) && tentativas < MAX_TENTATIVAS_NUMERO =>
            {
                tracing::warn!(tentativas, "colisão de numero_pedido; tentando de novo");
            }
            Err(erro) => return Err(erro),
        }
    };

    tracing::info!(
        numero_pedido = %resposta.pedido.numero_pedido,
        total = %resposta.pedido.total,
        "pedido criado"
    );

    Ok(HttpResponse::Created().json(GenericResponse::sucesso("Pedido criado com sucesso", resposta)))
}

/// Rota para listar pedidos, opcionalmente filtrados por status
/// (vendedor ou admin).
#[get("/pedidos")]
pub async fn listar_pedidos(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    filtro: web::Query<FiltroStatus>,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_vendedor_ou_admin()?;

    let pedidos = match &filtro.status {
        Some(status) => {
            let status = StatusPedido::parse(status)?;
            sqlx::query_as::<_, Pedido>(&format!(
                "SELECT {} FROM pedidos WHERE status = $1 ORDER BY created_at DESC",
                COLUNAS_PEDIDO
            ))
            .bind(status.as_str())
            .fetch_all(&data.db_pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Pedido>(&format!(
                "SELECT {} FROM pedidos ORDER BY created_at DESC",
                COLUNAS_PEDIDO
            ))
            .fetch_all(&data.db_pool)
            .await?
        }
    };

    let mut resposta = Vec::with_capacity(pedidos.len());
    for pedido in pedidos {
        let itens = itens_do_pedido(&data.db_pool, pedido.id).await?;
        resposta.push(PedidoResponse { pedido, itens });
    }

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Pedidos listados com sucesso", resposta)))
}

/// Rota para listar os pedidos de um status (vendedor ou admin).
#[get("/pedidos/status/{status}")]
pub async fn listar_pedidos_por_status(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_vendedor_ou_admin()?;
    let status = StatusPedido::parse(&path.into_inner())?;

    let pedidos = sqlx::query_as::<_, Pedido>(&format!(
        "SELECT {} FROM pedidos WHERE status = $1 ORDER BY created_at DESC",
        COLUNAS_PEDIDO
    ))
    .bind(status.as_str())
    .fetch_all(&data.db_pool)
    .await?;

    let mut resposta = Vec::with_capacity(pedidos.len());
    for pedido in pedidos {
        let itens = itens_do_pedido(&data.db_pool, pedido.id).await?;
        resposta.push(PedidoResponse { pedido, itens });
    }

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Pedidos listados com sucesso", resposta)))
}

/// Rota para obter um pedido pelo número legível.
#[get("/pedidos/numero/{numero_pedido}")]
pub async fn obter_pedido_por_numero(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let numero_pedido = path.into_inner();
    let pedido = sqlx::query_as::<_, Pedido>(&format!(
        "SELECT {} FROM pedidos WHERE numero_pedido = $1",
        COLUNAS_PEDIDO
    ))
    .bind(&numero_pedido)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Pedido não encontrado".to_string()))?;

    let itens = itens_do_pedido(&data.db_pool, pedido.id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Pedido encontrado",
        PedidoResponse { pedido, itens },
    )))
}

/// Rota para obter um pedido por ID.
#[get("/pedidos/{id}")]
pub async fn obter_pedido_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let pedido = sqlx::query_as::<_, Pedido>(&format!(
        "SELECT {} FROM pedidos WHERE id = $1",
        COLUNAS_PEDIDO
    ))
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Pedido não encontrado".to_string()))?;

    let itens = itens_do_pedido(&data.db_pool, pedido.id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Pedido encontrado",
        PedidoResponse { pedido, itens },
    )))
}

/// Rota para atualizar o status de um pedido (vendedor ou admin).
///
/// Não há tabela de transições: qualquer status conhecido pode suceder
/// qualquer outro, inclusive para trás.
#[put("/pedidos/{id}/status")]
pub async fn atualizar_status(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    corpo: web::Json<AtualizaStatus>,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_vendedor_ou_admin()?;
    let id = path.into_inner();
    let status = StatusPedido::parse(&corpo.status)?;

    let pedido = sqlx::query_as::<_, Pedido>(&format!(
        "UPDATE pedidos SET status = $1 WHERE id = $2 RETURNING {}",
        COLUNAS_PEDIDO
    ))
    .bind(status.as_str())
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Pedido não encontrado".to_string()))?;

    let itens = itens_do_pedido(&data.db_pool, pedido.id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Status do pedido atualizado com sucesso",
        PedidoResponse { pedido, itens },
    )))
}

/// Rota para cancelar um pedido (vendedor ou admin).
///
/// Credita o estoque de cada linha e marca o pedido como cancelado, tudo na
/// mesma transação; um pedido já cancelado é rejeitado e o estoque não é
/// creditado duas vezes.
#[delete("/pedidos/{id}")]
pub async fn cancelar_pedido(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_vendedor_ou_admin()?;
    let id = path.into_inner();

    let mut transaction = data.db_pool.begin().await?;

    let pedido = sqlx::query_as::<_, Pedido>(&format!(
        "SELECT {} FROM pedidos WHERE id = $1 FOR UPDATE",
        COLUNAS_PEDIDO
    ))
    .bind(id)
    .fetch_optional(&mut *transaction)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Pedido não encontrado".to_string()))?;

    regras::validar_cancelamento(&pedido.status)?;

    let itens = sqlx::query_as::<_, ItemPedido>(&format!(
        "SELECT {} FROM itens_pedido WHERE pedido_id = $1 ORDER BY id",
        COLUNAS_ITEM_PEDIDO
    ))
    .bind(pedido.id)
    .fetch_all(&mut *transaction)
    .await?;

    for item in &itens {
        creditar_estoque(&mut transaction, item.produto_id, item.quantidade).await?;
    }

    let pedido = sqlx::query_as::<_, Pedido>(&format!(
        "UPDATE pedidos SET status = 'cancelado' WHERE id = $1 RETURNING {}",
        COLUNAS_PEDIDO
    ))
    .bind(pedido.id)
    .fetch_one(&mut *transaction)
    .await?;

    transaction.commit().await?;

    tracing::info!(numero_pedido = %pedido.numero_pedido, "pedido cancelado");

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Pedido cancelado com sucesso",
        PedidoResponse { pedido, itens },
    )))
}
