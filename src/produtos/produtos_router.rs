// src/produtos/produtos_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::query_as;

// Importa as structs definidas no módulo `produtos_structs`
use super::produtos_structs::{
    validar_promocao, AtualizaProduto, BuscaPorNome, DefinePromocao, LimiteListagem, NovoProduto,
    Produto,
};
use crate::shared::erros::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::shared::validacoes;
use crate::usuarios::auth_middleware::AuthenticatedUser;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Colunas de produto, na ordem esperada pela struct `Produto`.
const COLUNAS_PRODUTO: &str = "id, nome, descricao, preco, imagem, cor, tamanho, quantidade, \
     quantidade_vendida, em_promocao, preco_promocional, categoria_id";

const LIMITE_PADRAO: i64 = 10;

/// Rota para listar todos os produtos.
#[get("/produtos")]
pub async fn listar_produtos(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let produtos = query_as::<_, Produto>(&format!(
        "SELECT {} FROM produtos ORDER BY id",
        COLUNAS_PRODUTO
    ))
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Produtos listados com sucesso", produtos)))
}

/// Rota para buscar produtos pelo nome (busca parcial, sem caixa).
#[get("/produtos/busca")]
pub async fn buscar_produtos_por_nome(
    data: web::Data<AppState>,
    busca: web::Query<BuscaPorNome>,
) -> Result<HttpResponse, ApiError> {
    let produtos = query_as::<_, Produto>(&format!(
        "SELECT {} FROM produtos WHERE nome ILIKE '%' || $1 || '%' ORDER BY id",
        COLUNAS_PRODUTO
    ))
    .bind(&busca.nome)
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Produtos encontrados", produtos)))
}

/// Rota para listar os produtos atualmente em promoção.
#[get("/produtos/promocoes")]
pub async fn listar_promocoes(
    data: web::Data<AppState>,
    limite: web::Query<LimiteListagem>,
) -> Result<HttpResponse, ApiError> {
    let produtos = query_as::<_, Produto>(&format!(
        "SELECT {} FROM produtos WHERE em_promocao = TRUE ORDER BY id LIMIT $1",
        COLUNAS_PRODUTO
    ))
    .bind(limite.limit.unwrap_or(LIMITE_PADRAO))
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Produtos em promoção", produtos)))
}

/// Rota para listar os produtos mais vendidos.
#[get("/produtos/mais-vendidos")]
pub async fn listar_mais_vendidos(
    data: web::Data<AppState>,
    limite: web::Query<LimiteListagem>,
) -> Result<HttpResponse, ApiError> {
    let produtos = query_as::<_, Produto>(&format!(
        "SELECT {} FROM produtos ORDER BY quantidade_vendida DESC, id LIMIT $1",
        COLUNAS_PRODUTO
    ))
    .bind(limite.limit.unwrap_or(LIMITE_PADRAO))
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Produtos mais vendidos", produtos)))
}

/// Rota para listar os produtos de uma categoria.
#[get("/produtos/categoria/{categoria_id}")]
pub async fn listar_por_categoria(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let categoria_id = path.into_inner();
    let produtos = query_as::<_, Produto>(&format!(
        "SELECT {} FROM produtos WHERE categoria_id = $1 ORDER BY id",
        COLUNAS_PRODUTO
    ))
    .bind(categoria_id)
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Produtos da categoria", produtos)))
}

/// Rota para buscar um produto por ID.
#[get("/produtos/{id}")]
pub async fn obter_produto_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let produto = query_as::<_, Produto>(&format!(
        "SELECT {} FROM produtos WHERE id = $1",
        COLUNAS_PRODUTO
    ))
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Produto não encontrado".to_string()))?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Produto com ID {} encontrado", id),
        produto,
    )))
}

/// Rota para cadastrar um novo produto (somente vendedor).
#[post("/produtos")]
pub async fn cadastrar_produto(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    item: web::Json<NovoProduto>,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_vendedor()?;
    let item = item.into_inner();

    if !validacoes::validar_nome(&item.nome) {
        return Err(ApiError::Validacao(
            "Nome do produto deve ter pelo menos 3 caracteres".to_string(),
        ));
    }
    if !validacoes::validar_preco(&item.preco) {
        return Err(ApiError::Validacao(
            "Preço deve ser um valor positivo".to_string(),
        ));
    }
    if !validacoes::validar_url(&item.imagem) {
        return Err(ApiError::Validacao("URL de imagem inválida".to_string()));
    }
    let quantidade = item.quantidade.unwrap_or(0);
    if quantidade < 0 {
        return Err(ApiError::Validacao(
            "Quantidade não pode ser negativa".to_string(),
        ));
    }

    let em_promocao = item.em_promocao.unwrap_or(false);
    validar_promocao(&item.preco, em_promocao, item.preco_promocional.as_ref())?;
    let preco_promocional = if em_promocao { item.preco_promocional } else { None };

    // Verifica se a categoria existe
    let categoria_existe = sqlx::query("SELECT id FROM categorias WHERE id = $1")
        .bind(item.categoria_id)
        .fetch_optional(&data.db_pool)
        .await?;
    if categoria_existe.is_none() {
        return Err(ApiError::NaoEncontrado("Categoria não encontrada".to_string()));
    }

    let produto = query_as::<_, Produto>(&format!(
        "INSERT INTO produtos \
             (nome, descricao, preco, imagem, cor, tamanho, quantidade, em_promocao, preco_promocional, categoria_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {}",
        COLUNAS_PRODUTO
    ))
    .bind(&item.nome)
    .bind(&item.descricao)
    .bind(&item.preco)
    .bind(&item.imagem)
    .bind(&item.cor)
    .bind(&item.tamanho)
    .bind(quantidade)
    .bind(em_promocao)
    .bind(&preco_promocional)
    .bind(item.categoria_id)
    .fetch_one(&data.db_pool)
    .await?;

    Ok(HttpResponse::Created().json(GenericResponse::sucesso("Produto criado com sucesso", produto)))
}

/// Rota para atualizar um produto (somente vendedor).
///
/// Atualização parcial: campos ausentes mantêm o valor atual. A regra da
/// promoção é revalidada contra o preço base efetivo após a mesclagem.
#[put("/produtos/{id}")]
pub async fn atualizar_produto(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<AtualizaProduto>,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_vendedor()?;
    let id = path.into_inner();
    let item = item.into_inner();

    let atual = query_as::<_, Produto>(&format!(
        "SELECT {} FROM produtos WHERE id = $1",
        COLUNAS_PRODUTO
    ))
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Produto não encontrado".to_string()))?;

    let nome = item.nome.unwrap_or(atual.nome);
    if !validacoes::validar_nome(&nome) {
        return Err(ApiError::Validacao(
            "Nome do produto deve ter pelo menos 3 caracteres".to_string(),
        ));
    }
    let preco = item.preco.unwrap_or(atual.preco);
    if !validacoes::validar_preco(&preco) {
        return Err(ApiError::Validacao(
            "Preço deve ser um valor positivo".to_string(),
        ));
    }
    let imagem = item.imagem.unwrap_or(atual.imagem);
    if !validacoes::validar_url(&imagem) {
        return Err(ApiError::Validacao("URL de imagem inválida".to_string()));
    }
    let quantidade = item.quantidade.unwrap_or(atual.quantidade);
    if quantidade < 0 {
        return Err(ApiError::Validacao(
            "Quantidade não pode ser negativa".to_string(),
        ));
    }
    let quantidade_vendida = item.quantidade_vendida.unwrap_or(atual.quantidade_vendida);
    if quantidade_vendida < 0 {
        return Err(ApiError::Validacao(
            "Quantidade vendida não pode ser negativa".to_string(),
        ));
    }

    let descricao = item.descricao.unwrap_or(atual.descricao);
    let cor = item.cor.or(atual.cor);
    let tamanho = item.tamanho.or(atual.tamanho);

    let em_promocao = item.em_promocao.unwrap_or(atual.em_promocao);
    let preco_promocional = if em_promocao {
        item.preco_promocional.or(atual.preco_promocional)
    } else {
        None
    };
    validar_promocao(&preco, em_promocao, preco_promocional.as_ref())?;

    let categoria_id = match item.categoria_id {
        Some(nova_categoria) => {
            let existe = sqlx::query("SELECT id FROM categorias WHERE id = $1")
                .bind(nova_categoria)
                .fetch_optional(&data.db_pool)
                .await?;
            if existe.is_none() {
                return Err(ApiError::NaoEncontrado("Categoria não encontrada".to_string()));
            }
            nova_categoria
        }
        None => atual.categoria_id,
    };

    let produto = query_as::<_, Produto>(&format!(
        "UPDATE produtos SET nome = $1, descricao = $2, preco = $3, imagem = $4, cor = $5, \
             tamanho = $6, quantidade = $7, quantidade_vendida = $8, em_promocao = $9, \
             preco_promocional = $10, categoria_id = $11 \
         WHERE id = $12 RETURNING {}",
        COLUNAS_PRODUTO
    ))
    .bind(&nome)
    .bind(&descricao)
    .bind(&preco)
    .bind(&imagem)
    .bind(&cor)
    .bind(&tamanho)
    .bind(quantidade)
    .bind(quantidade_vendida)
    .bind(em_promocao)
    .bind(&preco_promocional)
    .bind(categoria_id)
    .bind(id)
    .fetch_one(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Produto atualizado com sucesso",
        produto,
    )))
}

/// Rota para ativar ou desativar a promoção de um produto (somente vendedor).
#[put("/produtos/{id}/promocao")]
pub async fn definir_promocao(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    corpo: web::Json<DefinePromocao>,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_vendedor()?;
    let id = path.into_inner();
    let corpo = corpo.into_inner();

    let atual = query_as::<_, Produto>(&format!(
        "SELECT {} FROM produtos WHERE id = $1",
        COLUNAS_PRODUTO
    ))
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Produto não encontrado".to_string()))?;

    validar_promocao(&atual.preco, corpo.em_promocao, corpo.preco_promocional.as_ref())?;
    let preco_promocional = if corpo.em_promocao {
        corpo.preco_promocional
    } else {
        None
    };

    let produto = query_as::<_, Produto>(&format!(
        "UPDATE produtos SET em_promocao = $1, preco_promocional = $2 WHERE id = $3 RETURNING {}",
        COLUNAS_PRODUTO
    ))
    .bind(corpo.em_promocao)
    .bind(&preco_promocional)
    .bind(id)
    .fetch_one(&data.db_pool)
    .await?;

    let mensagem = if corpo.em_promocao {
        "Promoção definida com sucesso"
    } else {
        "Promoção removida com sucesso"
    };
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(mensagem, produto)))
}

/// Rota para deletar um produto (somente vendedor).
#[delete("/produtos/{id}")]
pub async fn deletar_produto(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_vendedor()?;
    let id = path.into_inner();

    let resultado = sqlx::query("DELETE FROM produtos WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado("Produto não encontrado".to_string()));
    }

    Ok(HttpResponse::Ok().json(GenericResponse::mensagem("Produto deletado com sucesso")))
}
