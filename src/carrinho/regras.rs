// src/carrinho/regras.rs
//! Regras puras do carrinho: fusão de quantidades, verificação de estoque,
//! precificação da linha e total. Sem I/O, cobertas por testes de unidade.

use bigdecimal::BigDecimal;

use super::carrinho_structs::ItemCarrinho;
use crate::produtos::produtos_structs::Produto;
use crate::shared::erros::ApiError;

/// Quantidade que a linha passaria a ter após adicionar `adicionada`,
/// fundindo com a quantidade já presente no carrinho, se houver.
pub fn quantidade_apos_adicao(existente: Option<&ItemCarrinho>, adicionada: i32) -> i32 {
    existente.map(|item| item.quantidade).unwrap_or(0) + adicionada
}

/// Confere a quantidade solicitada contra o estoque atual do produto.
///
/// A leitura é consultiva: nada fica reservado, e dois carrinhos podem passar
/// pela conferência ao mesmo tempo. A garantia final é o decremento
/// condicional no fechamento do pedido.
pub fn conferir_estoque(produto: &Produto, solicitada: i32) -> Result<(), ApiError> {
    if solicitada > produto.quantidade {
        return Err(ApiError::EstoqueInsuficiente(format!(
            "Estoque insuficiente para o produto {}. Disponível: {}",
            produto.nome, produto.quantidade
        )));
    }
    Ok(())
}

/// Resolve o preço unitário vigente e o subtotal de uma linha do carrinho.
///
/// O preço nunca fica travado na primeira adição: toda mutação da linha
/// resolve o preço de novo, inclusive quando a promoção passou a valer
/// depois da linha existir.
pub fn precificar_linha(produto: &Produto, quantidade: i32) -> (BigDecimal, BigDecimal) {
    let preco_unitario = produto.preco_vigente().clone();
    let subtotal = &preco_unitario * BigDecimal::from(quantidade);
    (preco_unitario, subtotal)
}

/// Total do carrinho é, por definição, a soma dos subtotais das linhas.
pub fn total_do_carrinho(itens: &[ItemCarrinho]) -> BigDecimal {
    itens
        .iter()
        .fold(BigDecimal::from(0), |acumulado, item| acumulado + &item.subtotal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn produto(estoque: i32, preco: i32, promocional: Option<i32>) -> Produto {
        Produto {
            id: 7,
            nome: "Blusa Cropped".to_string(),
            descricao: "Blusa cropped canelada".to_string(),
            preco: BigDecimal::from(preco),
            imagem: "https://cdn.exemplo.com/blusa.png".to_string(),
            cor: Some("preto".to_string()),
            tamanho: Some("M".to_string()),
            quantidade: estoque,
            quantidade_vendida: 0,
            em_promocao: promocional.is_some(),
            preco_promocional: promocional.map(BigDecimal::from),
            categoria_id: 2,
        }
    }

    fn linha(quantidade: i32, preco_unitario: i32) -> ItemCarrinho {
        ItemCarrinho {
            id: 1,
            carrinho_id: 1,
            produto_id: 7,
            quantidade,
            preco_unitario: BigDecimal::from(preco_unitario),
            subtotal: BigDecimal::from(preco_unitario * quantidade),
        }
    }

    #[test]
    fn subtotal_eh_quantidade_vezes_preco_unitario() {
        let (preco_unitario, subtotal) = precificar_linha(&produto(10, 50, None), 2);
        assert_eq!(preco_unitario, BigDecimal::from(50));
        assert_eq!(subtotal, BigDecimal::from(100));
    }

    #[test]
    fn linha_repreca_com_promocao_que_comecou_depois() {
        // A linha foi criada a 100; a promoção de 80 entrou depois. A próxima
        // mutação resolve o preço de novo e repreça a linha inteira.
        let (preco_unitario, subtotal) = precificar_linha(&produto(10, 100, Some(80)), 3);
        assert_eq!(preco_unitario, BigDecimal::from(80));
        assert_eq!(subtotal, BigDecimal::from(240));
    }

    #[test]
    fn adicao_funde_com_quantidade_existente() {
        let existente = linha(3, 80);
        assert_eq!(quantidade_apos_adicao(Some(&existente), 3), 6);
        assert_eq!(quantidade_apos_adicao(None, 3), 3);
    }

    #[test]
    fn estoque_barra_quantidade_acima_do_disponivel() {
        let p = produto(5, 100, None);
        assert!(conferir_estoque(&p, 5).is_ok());
        assert!(matches!(
            conferir_estoque(&p, 6),
            Err(ApiError::EstoqueInsuficiente(_))
        ));
    }

    #[test]
    fn total_soma_subtotais_de_todas_as_linhas() {
        let itens = vec![linha(2, 50), linha(1, 30)];
        assert_eq!(total_do_carrinho(&itens), BigDecimal::from(130));
        assert_eq!(total_do_carrinho(&[]), BigDecimal::from(0));
    }

    // Cenário de ponta a ponta das regras: estoque 5, preço 100, promoção 80.
    #[test]
    fn adicao_com_fusao_que_estoura_estoque_nao_altera_a_linha() {
        let p = produto(5, 100, Some(80));

        // Primeira adição de 3 unidades: linha a 80, subtotal 240.
        let pedida = quantidade_apos_adicao(None, 3);
        conferir_estoque(&p, pedida).expect("3 unidades cabem no estoque");
        let (preco_unitario, subtotal) = precificar_linha(&p, pedida);
        assert_eq!(preco_unitario, BigDecimal::from(80));
        assert_eq!(subtotal, BigDecimal::from(240));

        let existente = ItemCarrinho {
            id: 1,
            carrinho_id: 1,
            produto_id: p.id,
            quantidade: pedida,
            preco_unitario,
            subtotal,
        };
        assert_eq!(total_do_carrinho(std::slice::from_ref(&existente)), BigDecimal::from(240));

        // Segunda adição de 3: fusão pede 6 > estoque 5, rejeitada antes de
        // precificar; a linha e o total permanecem como estavam.
        let fundida = quantidade_apos_adicao(Some(&existente), 3);
        assert_eq!(fundida, 6);
        assert!(matches!(
            conferir_estoque(&p, fundida),
            Err(ApiError::EstoqueInsuficiente(_))
        ));
        assert_eq!(existente.quantidade, 3);
        assert_eq!(total_do_carrinho(std::slice::from_ref(&existente)), BigDecimal::from(240));
    }
}
