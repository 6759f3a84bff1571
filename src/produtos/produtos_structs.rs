// src/produtos/produtos_structs.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::erros::ApiError;

/// Estrutura que representa um produto no banco de dados.
///
/// `quantidade` é o estoque disponível e `quantidade_vendida` o acumulado de
/// vendas; os dois contadores só mudam juntos, no fechamento e no
/// cancelamento de pedidos.
#[derive(Serialize, FromRow, Clone)]
pub struct Produto {
    pub id: i32,
    pub nome: String,
    pub descricao: String,
    pub preco: BigDecimal,
    pub imagem: String,
    pub cor: Option<String>,
    pub tamanho: Option<String>,
    pub quantidade: i32,
    pub quantidade_vendida: i32,
    pub em_promocao: bool,
    pub preco_promocional: Option<BigDecimal>,
    pub categoria_id: i32,
}

impl Produto {
    /// Preço a cobrar neste instante: o promocional quando a promoção está
    /// ativa e tem preço definido, senão o preço base.
    ///
    /// Deve ser consultado de novo a cada mutação de carrinho e no snapshot
    /// do pedido; nunca se decide nada com um preço previamente guardado.
    pub fn preco_vigente(&self) -> &BigDecimal {
        match (self.em_promocao, &self.preco_promocional) {
            (true, Some(promocional)) => promocional,
            _ => &self.preco,
        }
    }
}

/// Regras da promoção: quando ativa, o preço promocional é obrigatório,
/// positivo e menor que o preço base.
pub fn validar_promocao(
    preco_base: &BigDecimal,
    em_promocao: bool,
    preco_promocional: Option<&BigDecimal>,
) -> Result<(), ApiError> {
    if !em_promocao {
        return Ok(());
    }

    let promocional = preco_promocional.ok_or_else(|| {
        ApiError::Validacao(
            "preco_promocional é obrigatório quando em_promocao é true".to_string(),
        )
    })?;
    if promocional <= &BigDecimal::from(0) {
        return Err(ApiError::Validacao(
            "Preço promocional deve ser maior que zero".to_string(),
        ));
    }
    if promocional >= preco_base {
        return Err(ApiError::Validacao(
            "Preço promocional deve ser menor que o preço normal".to_string(),
        ));
    }
    Ok(())
}

/// Estrutura para receber dados do novo produto na requisição POST
#[derive(Deserialize)]
pub struct NovoProduto {
    pub nome: String,
    pub descricao: String,
    pub preco: BigDecimal,
    pub imagem: String,
    pub cor: Option<String>,
    pub tamanho: Option<String>,
    pub quantidade: Option<i32>,
    pub categoria_id: i32,
    pub em_promocao: Option<bool>,
    pub preco_promocional: Option<BigDecimal>,
}

/// Estrutura para atualização parcial de um produto (PUT)
#[derive(Deserialize)]
pub struct AtualizaProduto {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub preco: Option<BigDecimal>,
    pub imagem: Option<String>,
    pub cor: Option<String>,
    pub tamanho: Option<String>,
    pub quantidade: Option<i32>,
    pub quantidade_vendida: Option<i32>,
    pub categoria_id: Option<i32>,
    pub em_promocao: Option<bool>,
    pub preco_promocional: Option<BigDecimal>,
}

/// Corpo da rota de definição de promoção (PUT /produtos/{id}/promocao)
#[derive(Deserialize)]
pub struct DefinePromocao {
    pub em_promocao: bool,
    pub preco_promocional: Option<BigDecimal>,
}

/// Parâmetros de busca por nome (GET /produtos/busca?nome=)
#[derive(Deserialize)]
pub struct BuscaPorNome {
    pub nome: String,
}

/// Parâmetro de limite das listagens de destaque
#[derive(Deserialize)]
pub struct LimiteListagem {
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn produto(preco: i32, em_promocao: bool, promocional: Option<i32>) -> Produto {
        Produto {
            id: 1,
            nome: "Vestido Midi".to_string(),
            descricao: "Vestido midi floral".to_string(),
            preco: BigDecimal::from(preco),
            imagem: "https://cdn.exemplo.com/vestido.png".to_string(),
            cor: None,
            tamanho: None,
            quantidade: 10,
            quantidade_vendida: 0,
            em_promocao,
            preco_promocional: promocional.map(BigDecimal::from),
            categoria_id: 1,
        }
    }

    #[test]
    fn preco_vigente_usa_promocional_quando_promocao_ativa() {
        let p = produto(100, true, Some(80));
        assert_eq!(p.preco_vigente(), &BigDecimal::from(80));
    }

    #[test]
    fn preco_vigente_ignora_promocional_com_promocao_inativa() {
        let p = produto(100, false, Some(80));
        assert_eq!(p.preco_vigente(), &BigDecimal::from(100));
    }

    #[test]
    fn preco_vigente_cai_no_base_sem_preco_promocional() {
        let p = produto(100, true, None);
        assert_eq!(p.preco_vigente(), &BigDecimal::from(100));
    }

    #[test]
    fn promocao_ativa_exige_preco_promocional() {
        let resultado = validar_promocao(&BigDecimal::from(100), true, None);
        assert!(matches!(resultado, Err(ApiError::Validacao(_))));
    }

    #[test]
    fn promocao_rejeita_preco_maior_ou_igual_ao_base() {
        let base = BigDecimal::from(100);
        assert!(matches!(
            validar_promocao(&base, true, Some(&BigDecimal::from(100))),
            Err(ApiError::Validacao(_))
        ));
        assert!(matches!(
            validar_promocao(&base, true, Some(&BigDecimal::from(120))),
            Err(ApiError::Validacao(_))
        ));
    }

    #[test]
    fn promocao_rejeita_preco_nao_positivo() {
        let base = BigDecimal::from(100);
        assert!(matches!(
            validar_promocao(&base, true, Some(&BigDecimal::from(0))),
            Err(ApiError::Validacao(_))
        ));
    }

    #[test]
    fn promocao_inativa_nao_valida_nada() {
        assert!(validar_promocao(&BigDecimal::from(100), false, None).is_ok());
    }

    #[test]
    fn promocao_valida_passa() {
        assert!(validar_promocao(&BigDecimal::from(100), true, Some(&BigDecimal::from(80))).is_ok());
    }
}
