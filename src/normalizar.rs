use crate::{
    CLASSIFICACAO_NAO_INFORMADA, Celula, LARGURA_PATRIMONIO, PatrimonioError, PatrimonioResult,
    RE_SUFIXO_PONTO_ZERO,
};

/// Formata o Número de Patrimônio com 6 dígitos.
///
/// 1. Converte a célula para texto (números são escritos sem notação científica).
/// 2. Descarta tudo a partir do primeiro `.` (ex.: `1234.0` lido como decimal).
/// 3. Preenche com zeros à esquerda até 6 caracteres, preservando o sinal.
///
/// Valores com mais de 6 dígitos são mantidos sem truncamento.
///
/// `registro` é o número (base 1) do registro, usado apenas na mensagem de erro.
///
/// ### Exemplo
/// ```
/// use transferencia_patrimonial::{Celula, normalizar_patrimonio};
///
/// assert_eq!(normalizar_patrimonio(&Celula::Numero(1.0), 1).unwrap(), "000001");
/// assert_eq!(normalizar_patrimonio(&Celula::from("4521.0"), 2).unwrap(), "004521");
/// ```
pub fn normalizar_patrimonio(celula: &Celula, registro: usize) -> PatrimonioResult<String> {
    let erro = |detalhe: &str| PatrimonioError::Formato {
        registro,
        valor: celula.to_string(),
        detalhe: detalhe.to_string(),
    };

    let texto = match celula {
        Celula::Texto(texto) => texto.trim().to_string(),
        Celula::Numero(numero) if numero.is_finite() => numero.to_string(),
        Celula::Numero(_) => return Err(erro("valor numérico não finito")),
        Celula::Ausente => return Err(erro("valor ausente")),
    };

    // split sempre produz ao menos um item
    let parte_inteira = texto.split('.').next().unwrap_or_default();

    if parte_inteira.is_empty() {
        return Err(erro("não há dígitos antes do ponto decimal"));
    }

    Ok(preencher_com_zeros(parte_inteira, LARGURA_PATRIMONIO))
}

/// Preenche `texto` com zeros à esquerda até `largura` caracteres.
/// Um sinal inicial (`+`/`-`) permanece na frente dos zeros.
fn preencher_com_zeros(texto: &str, largura: usize) -> String {
    let tamanho = texto.chars().count();
    if tamanho >= largura {
        return texto.to_string();
    }

    let zeros = "0".repeat(largura - tamanho);

    match texto.strip_prefix(['+', '-']) {
        Some(resto) => format!("{}{zeros}{resto}", &texto[..1]),
        None => format!("{zeros}{texto}"),
    }
}

/// Limpa a Classificação Contábil.
///
/// Valores ausentes ou em branco recebem [`CLASSIFICACAO_NAO_INFORMADA`].
/// O sufixo `.0` (código lido como número decimal) é removido e os espaços
/// das extremidades são descartados. A limpeza é repetida até o texto
/// estabilizar, de modo que aplicá-la duas vezes dá o mesmo resultado.
///
/// ### Exemplo
/// ```
/// use transferencia_patrimonial::{Celula, normalizar_classificacao};
///
/// assert_eq!(normalizar_classificacao(&Celula::from(" 12.0 "), 1).unwrap(), "12");
/// assert_eq!(
///     normalizar_classificacao(&Celula::Ausente, 2).unwrap(),
///     "CLASSIFICACAO_NAO_INFORMADA"
/// );
/// ```
pub fn normalizar_classificacao(celula: &Celula, registro: usize) -> PatrimonioResult<String> {
    let mut texto = match celula {
        Celula::Texto(texto) => texto.clone(),
        Celula::Numero(numero) if numero.is_finite() => numero.to_string(),
        // NaN é a representação numérica de célula vazia
        Celula::Numero(numero) if numero.is_nan() => {
            return Ok(CLASSIFICACAO_NAO_INFORMADA.to_string());
        }
        Celula::Numero(_) => {
            return Err(PatrimonioError::Limpeza {
                registro,
                valor: celula.to_string(),
                detalhe: "valor numérico não finito".to_string(),
            });
        }
        Celula::Ausente => return Ok(CLASSIFICACAO_NAO_INFORMADA.to_string()),
    };

    loop {
        let limpo = RE_SUFIXO_PONTO_ZERO.replace(texto.trim(), "").trim().to_string();
        if limpo == texto {
            break;
        }
        texto = limpo;
    }

    if texto.is_empty() {
        return Ok(CLASSIFICACAO_NAO_INFORMADA.to_string());
    }

    Ok(texto)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patrimonio_curto_recebe_zeros_a_esquerda() {
        for (entrada, esperado) in [
            (Celula::Numero(1.0), "000001"),
            (Celula::Numero(2.0), "000002"),
            (Celula::Numero(123456.0), "123456"),
            (Celula::from("42"), "000042"),
            (Celula::from(" 42 "), "000042"),
            (Celula::from("987.65"), "000987"),
            (Celula::Numero(31.9), "000031"),
        ] {
            let normalizado = normalizar_patrimonio(&entrada, 1).unwrap();
            assert_eq!(normalizado, esperado, "entrada: {entrada:?}");
            assert_eq!(normalizado.len(), LARGURA_PATRIMONIO);
        }
    }

    #[test]
    fn patrimonio_longo_nao_eh_truncado() {
        assert_eq!(
            normalizar_patrimonio(&Celula::from("12345678"), 1).unwrap(),
            "12345678"
        );
        assert_eq!(
            normalizar_patrimonio(&Celula::Numero(1234567.0), 1).unwrap(),
            "1234567"
        );
    }

    #[test]
    fn patrimonio_preserva_sinal() {
        assert_eq!(normalizar_patrimonio(&Celula::from("-5"), 1).unwrap(), "-00005");
        assert_eq!(normalizar_patrimonio(&Celula::from("+12"), 1).unwrap(), "+00012");
    }

    #[test]
    fn patrimonio_normalizado_eh_estavel() {
        for entrada in ["1", "000001", "4521.0", "12345678", "-5"] {
            let uma_vez = normalizar_patrimonio(&Celula::from(entrada), 1).unwrap();
            let duas_vezes = normalizar_patrimonio(&Celula::from(uma_vez.as_str()), 1).unwrap();
            assert_eq!(uma_vez, duas_vezes);
        }
    }

    #[test]
    fn patrimonio_invalido_gera_erro_de_formato() {
        let casos = [
            (Celula::Ausente, 3),
            (Celula::Numero(f64::INFINITY), 4),
            (Celula::from(".5"), 5),
        ];

        for (entrada, registro) in casos {
            match normalizar_patrimonio(&entrada, registro) {
                Err(PatrimonioError::Formato { registro: r, .. }) => assert_eq!(r, registro),
                outro => panic!("esperado erro de formato para {entrada:?}, obtido {outro:?}"),
            }
        }
    }

    #[test]
    fn classificacao_ausente_recebe_sentinela() {
        for entrada in [
            Celula::Ausente,
            Celula::from("   "),
            Celula::from(".0"),
            Celula::Numero(f64::NAN),
        ] {
            assert_eq!(
                normalizar_classificacao(&entrada, 1).unwrap(),
                CLASSIFICACAO_NAO_INFORMADA
            );
        }
    }

    #[test]
    fn classificacao_remove_sufixo_ponto_zero() {
        assert_eq!(normalizar_classificacao(&Celula::from("12.0"), 1).unwrap(), "12");
        assert_eq!(normalizar_classificacao(&Celula::from(" 12.0 "), 1).unwrap(), "12");
        assert_eq!(normalizar_classificacao(&Celula::Numero(12.0), 1).unwrap(), "12");
        assert_eq!(
            normalizar_classificacao(&Celula::from("Veículos"), 1).unwrap(),
            "Veículos"
        );
        // apenas o sufixo exato é removido
        assert_eq!(normalizar_classificacao(&Celula::from("12.05"), 1).unwrap(), "12.05");
        assert_eq!(normalizar_classificacao(&Celula::from("12.00"), 1).unwrap(), "12.00");
    }

    #[test]
    fn classificacao_normalizada_eh_estavel() {
        for entrada in ["12.0", " 12.0 ", "12.0.0", "Móveis e Utensílios", CLASSIFICACAO_NAO_INFORMADA] {
            let uma_vez = normalizar_classificacao(&Celula::from(entrada), 1).unwrap();
            let duas_vezes = normalizar_classificacao(&Celula::from(uma_vez.as_str()), 1).unwrap();
            assert_eq!(uma_vez, duas_vezes);
        }
    }

    #[test]
    fn classificacao_infinita_gera_erro_de_limpeza() {
        let resultado = normalizar_classificacao(&Celula::Numero(f64::NEG_INFINITY), 9);
        assert!(matches!(
            resultado,
            Err(PatrimonioError::Limpeza { registro: 9, .. })
        ));
    }
}
