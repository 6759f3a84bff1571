// src/pedidos/regras.rs
//! Regras puras de pedidos: status, número legível, validação de contato e
//! montagem do snapshot das linhas.

use bigdecimal::BigDecimal;
use chrono::Utc;
use rand::Rng;

use crate::carrinho::carrinho_structs::ItemCarrinho;
use crate::shared::erros::ApiError;
use crate::shared::validacoes;

/// Status possíveis de um pedido. `pendente` é o inicial e `cancelado` o
/// único terminal de fato; `entregue` é terminal apenas por convenção.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPedido {
    Pendente,
    Confirmado,
    Enviado,
    Entregue,
    Cancelado,
}

pub const STATUS_VALIDOS: [&str; 5] =
    ["pendente", "confirmado", "enviado", "entregue", "cancelado"];

impl StatusPedido {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusPedido::Pendente => "pendente",
            StatusPedido::Confirmado => "confirmado",
            StatusPedido::Enviado => "enviado",
            StatusPedido::Entregue => "entregue",
            StatusPedido::Cancelado => "cancelado",
        }
    }

    /// Qualquer transição entre status conhecidos é aceita, inclusive para
    /// trás; apenas o valor em si precisa ser válido.
    pub fn parse(valor: &str) -> Result<StatusPedido, ApiError> {
        match valor {
            "pendente" => Ok(StatusPedido::Pendente),
            "confirmado" => Ok(StatusPedido::Confirmado),
            "enviado" => Ok(StatusPedido::Enviado),
            "entregue" => Ok(StatusPedido::Entregue),
            "cancelado" => Ok(StatusPedido::Cancelado),
            _ => Err(ApiError::Validacao(format!(
                "Status inválido. Valores válidos: {}",
                STATUS_VALIDOS.join(", ")
            ))),
        }
    }
}

/// Número legível de pedido: `PED-<millis>-<0..999>`.
///
/// O formato sozinho não garante unicidade; a restrição única no banco é a
/// garantia real, e o fechamento tenta de novo com um número fresco quando a
/// inserção colide.
pub fn gerar_numero_pedido() -> String {
    let timestamp = Utc::now().timestamp_millis();
    let aleatorio: u32 = rand::thread_rng().gen_range(0..1000);
    format!("PED-{}-{}", timestamp, aleatorio)
}

/// Linha de pedido a inserir, copiada verbatim da linha do carrinho.
#[derive(Debug, Clone, PartialEq)]
pub struct NovoItemPedido {
    pub produto_id: i32,
    pub quantidade: i32,
    pub preco_unitario: BigDecimal,
    pub subtotal: BigDecimal,
}

/// Snapshot imutável do carrinho: o pedido congela quantidade e preço de cada
/// linha no fechamento, e mudanças futuras no produto não o afetam.
pub fn montar_itens_pedido(itens: &[ItemCarrinho]) -> Vec<NovoItemPedido> {
    itens
        .iter()
        .map(|item| NovoItemPedido {
            produto_id: item.produto_id,
            quantidade: item.quantidade,
            preco_unitario: item.preco_unitario.clone(),
            subtotal: item.subtotal.clone(),
        })
        .collect()
}

/// Valida os dados de contato do cliente antes de qualquer acesso ao banco.
pub fn validar_contato(nome: &str, email: &str, telefone: &str) -> Result<(), ApiError> {
    if !validacoes::validar_nome(nome) {
        return Err(ApiError::Validacao(
            "Nome do cliente deve ter pelo menos 3 caracteres".to_string(),
        ));
    }
    if !validacoes::validar_email(email) {
        return Err(ApiError::Validacao("Email inválido".to_string()));
    }
    if !validacoes::validar_telefone(telefone) {
        return Err(ApiError::Validacao(
            "Telefone inválido (deve ter 10 ou 11 dígitos)".to_string(),
        ));
    }
    Ok(())
}

/// Cancelar um pedido já cancelado é rejeitado; qualquer outro status pode
/// ser cancelado, e o estoque não é creditado duas vezes.
pub fn validar_cancelamento(status_atual: &str) -> Result<(), ApiError> {
    if status_atual == StatusPedido::Cancelado.as_str() {
        return Err(ApiError::PedidoJaCancelado);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrinho::regras::total_do_carrinho;

    fn linha(id: i32, produto_id: i32, quantidade: i32, preco_unitario: i32) -> ItemCarrinho {
        ItemCarrinho {
            id,
            carrinho_id: 1,
            produto_id,
            quantidade,
            preco_unitario: BigDecimal::from(preco_unitario),
            subtotal: BigDecimal::from(preco_unitario * quantidade),
        }
    }

    #[test]
    fn numero_de_pedido_tem_formato_ped_millis_aleatorio() {
        let numero = gerar_numero_pedido();
        let partes: Vec<&str> = numero.split('-').collect();
        assert_eq!(partes.len(), 3);
        assert_eq!(partes[0], "PED");
        let millis: i64 = partes[1].parse().expect("millis numérico");
        assert!(millis > 0);
        let aleatorio: u32 = partes[2].parse().expect("sufixo numérico");
        assert!(aleatorio < 1000);
    }

    #[test]
    fn snapshot_copia_as_linhas_verbatim() {
        let itens = vec![linha(1, 10, 2, 50), linha(2, 11, 1, 30)];
        let snapshot = montar_itens_pedido(&itens);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].produto_id, 10);
        assert_eq!(snapshot[0].quantidade, 2);
        assert_eq!(snapshot[0].preco_unitario, BigDecimal::from(50));
        assert_eq!(snapshot[0].subtotal, BigDecimal::from(100));
        assert_eq!(snapshot[1].produto_id, 11);
        assert_eq!(snapshot[1].subtotal, BigDecimal::from(30));
    }

    #[test]
    fn total_do_pedido_coincide_com_o_total_do_carrinho() {
        // O pedido herda total = carrinho.total; o snapshot precisa somar o mesmo.
        let itens = vec![linha(1, 10, 2, 50), linha(2, 11, 1, 30)];
        let soma_snapshot = montar_itens_pedido(&itens)
            .iter()
            .fold(BigDecimal::from(0), |acumulado, item| acumulado + &item.subtotal);
        assert_eq!(soma_snapshot, total_do_carrinho(&itens));
    }

    #[test]
    fn snapshot_de_carrinho_vazio_eh_vazio() {
        assert!(montar_itens_pedido(&[]).is_empty());
    }

    #[test]
    fn status_parse_aceita_somente_os_conhecidos() {
        for status in STATUS_VALIDOS {
            assert!(StatusPedido::parse(status).is_ok());
        }
        assert!(matches!(
            StatusPedido::parse("despachado"),
            Err(ApiError::Validacao(_))
        ));
        assert!(matches!(StatusPedido::parse(""), Err(ApiError::Validacao(_))));
    }

    #[test]
    fn status_parse_e_as_str_sao_inversos() {
        for status in STATUS_VALIDOS {
            let parseado = StatusPedido::parse(status).expect("status conhecido");
            assert_eq!(parseado.as_str(), status);
        }
    }

    #[test]
    fn cancelamento_duplo_eh_rejeitado() {
        assert!(matches!(
            validar_cancelamento("cancelado"),
            Err(ApiError::PedidoJaCancelado)
        ));
        assert!(validar_cancelamento("pendente").is_ok());
        assert!(validar_cancelamento("entregue").is_ok());
    }

    #[test]
    fn contato_valida_nome_email_e_telefone() {
        assert!(validar_contato("Maria Silva", "maria@exemplo.com", "(11) 98765-4321").is_ok());
        assert!(matches!(
            validar_contato("ab", "maria@exemplo.com", "11987654321"),
            Err(ApiError::Validacao(_))
        ));
        assert!(matches!(
            validar_contato("Maria", "maria@", "11987654321"),
            Err(ApiError::Validacao(_))
        ));
        assert!(matches!(
            validar_contato("Maria", "maria@exemplo.com", "123"),
            Err(ApiError::Validacao(_))
        ));
    }
}
