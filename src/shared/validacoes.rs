// src/shared/validacoes.rs

use bigdecimal::BigDecimal;
use once_cell::sync::Lazy;
use regex::Regex;

/// Formato geral de e-mail: algo@dominio.sufixo, sem espaços.
static REGEX_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("regex de e-mail inválida"));

pub fn validar_email(email: &str) -> bool {
    REGEX_EMAIL.is_match(email)
}

/// Telefone válido tem 10 ou 11 dígitos após descartar a máscara.
pub fn validar_telefone(telefone: &str) -> bool {
    let digitos = telefone.chars().filter(|c| c.is_ascii_digit()).count();
    (10..=11).contains(&digitos)
}

/// Nome precisa de pelo menos 3 caracteres úteis.
pub fn validar_nome(nome: &str) -> bool {
    nome.trim().len() >= 3
}

/// Quantidade válida é um inteiro estritamente positivo.
pub fn validar_quantidade(quantidade: i32) -> bool {
    quantidade > 0
}

/// Preço válido é estritamente positivo.
pub fn validar_preco(preco: &BigDecimal) -> bool {
    preco > &BigDecimal::from(0)
}

/// URL de imagem precisa ser absoluta (http ou https).
pub fn validar_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_aceita_formato_comum() {
        assert!(validar_email("maria@exemplo.com.br"));
        assert!(validar_email("a@b.co"));
    }

    #[test]
    fn email_rejeita_formatos_quebrados() {
        assert!(!validar_email("sem-arroba.com"));
        assert!(!validar_email("sem@dominio"));
        assert!(!validar_email("com espaco@exemplo.com"));
        assert!(!validar_email(""));
    }

    #[test]
    fn telefone_aceita_10_ou_11_digitos_com_ou_sem_mascara() {
        assert!(validar_telefone("(11) 98765-4321"));
        assert!(validar_telefone("11987654321"));
        assert!(validar_telefone("1133334444"));
    }

    #[test]
    fn telefone_rejeita_fora_da_faixa() {
        assert!(!validar_telefone("123456789"));
        assert!(!validar_telefone("123456789012"));
        assert!(!validar_telefone("abc"));
    }

    #[test]
    fn nome_exige_tres_caracteres_uteis() {
        assert!(validar_nome("Ana Maria"));
        assert!(validar_nome(" Bia "));
        assert!(!validar_nome("ab"));
        assert!(!validar_nome("  a  "));
    }

    #[test]
    fn quantidade_exige_inteiro_positivo() {
        assert!(validar_quantidade(1));
        assert!(validar_quantidade(37));
        assert!(!validar_quantidade(0));
        assert!(!validar_quantidade(-3));
    }

    #[test]
    fn preco_exige_valor_positivo() {
        assert!(validar_preco(&BigDecimal::from(10)));
        assert!(!validar_preco(&BigDecimal::from(0)));
        assert!(!validar_preco(&BigDecimal::from(-5)));
    }

    #[test]
    fn url_exige_esquema_http() {
        assert!(validar_url("https://cdn.exemplo.com/foto.png"));
        assert!(validar_url("http://exemplo.com/a.jpg"));
        assert!(!validar_url("ftp://exemplo.com/a.jpg"));
        assert!(!validar_url("foto.png"));
    }
}
