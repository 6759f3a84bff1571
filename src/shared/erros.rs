// src/shared/erros.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use super::shared_structs::GenericResponse;

/// Erros da API, classificados pelo efeito HTTP que produzem.
///
/// Os handlers devolvem `Result<HttpResponse, ApiError>`; a conversão para a
/// resposta JSON padronizada acontece uma única vez, na implementação de
/// `ResponseError`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Entrada malformada ou ausente (400).
    #[error("{0}")]
    Validacao(String),

    /// Recurso inexistente (404).
    #[error("{0}")]
    NaoEncontrado(String),

    /// Recurso de outro usuário ou papel insuficiente (403).
    #[error("{0}")]
    Proibido(String),

    /// Violação de campo único, ex. e-mail já cadastrado (409).
    #[error("{0}")]
    Conflito(String),

    /// Quantidade solicitada excede o estoque atual (400).
    #[error("{0}")]
    EstoqueInsuficiente(String),

    /// Fechamento de pedido com carrinho sem itens (400).
    #[error("Carrinho vazio, adicione produtos antes de finalizar")]
    CarrinhoVazio,

    /// Cancelamento de um pedido que já está cancelado (400).
    #[error("Pedido já foi cancelado")]
    PedidoJaCancelado,

    /// Login com e-mail ou senha incorretos (401).
    #[error("Credenciais inválidas")]
    CredenciaisInvalidas,

    #[error("Erro de banco de dados")]
    Banco(#[from] sqlx::Error),

    #[error("Erro ao processar senha")]
    Senha(#[from] bcrypt::BcryptError),

    #[error("Erro ao gerar token")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("{0}")]
    Interno(String),
}

impl ApiError {
    fn eh_interno(&self) -> bool {
        matches!(
            self,
            ApiError::Banco(_) | ApiError::Senha(_) | ApiError::Token(_) | ApiError::Interno(_)
        )
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validacao(_)
            | ApiError::EstoqueInsuficiente(_)
            | ApiError::CarrinhoVazio
            | ApiError::PedidoJaCancelado => StatusCode::BAD_REQUEST,
            ApiError::CredenciaisInvalidas => StatusCode::UNAUTHORIZED,
            ApiError::Proibido(_) => StatusCode::FORBIDDEN,
            ApiError::NaoEncontrado(_) => StatusCode::NOT_FOUND,
            ApiError::Conflito(_) => StatusCode::CONFLICT,
            ApiError::Banco(_) | ApiError::Senha(_) | ApiError::Token(_) | ApiError::Interno(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Erros internos saem com detalhe completo apenas no log; o cliente
        // recebe uma mensagem genérica. Os demais carregam a própria mensagem.
        let mensagem = if self.eh_interno() {
            tracing::error!(erro = ?self, "erro interno ao atender requisição");
            "Erro interno no servidor".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(self.status_code()).json(GenericResponse::<()> {
            status: "error".to_string(),
            message: mensagem,
            body: None,
        })
    }
}

/// Código SQLSTATE do Postgres para violação de restrição única.
const VIOLACAO_UNICIDADE: &str = "23505";

/// Identifica a violação de restrição única, usada para repetir o fechamento
/// de pedido quando o número gerado colide.
pub fn eh_violacao_unicidade(erro: &sqlx::Error) -> bool {
    match erro {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(VIOLACAO_UNICIDADE),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_http_segue_a_taxonomia() {
        assert_eq!(
            ApiError::Validacao("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::EstoqueInsuficiente("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::CarrinhoVazio.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::PedidoJaCancelado.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::CredenciaisInvalidas.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Proibido("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NaoEncontrado("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::Conflito("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Interno("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn erro_de_dominio_preserva_mensagem() {
        let erro = ApiError::EstoqueInsuficiente("Estoque insuficiente. Disponível: 2".into());
        assert_eq!(erro.to_string(), "Estoque insuficiente. Disponível: 2");
    }
}
