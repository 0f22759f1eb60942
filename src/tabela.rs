use std::fmt;

static AUSENTE: Celula = Celula::Ausente;

/// Conteúdo de uma célula da planilha.
///
/// Uma mesma coluna pode trazer texto, número ou nada, conforme a origem dos dados.
/// As regras de conversão para texto ficam em [`crate::normalizar_patrimonio`] e
/// [`crate::normalizar_classificacao`].
#[derive(Debug, Clone, PartialEq)]
pub enum Celula {
    Texto(String),
    Numero(f64),
    Ausente,
}

impl Celula {
    /// Célula de texto; strings em branco viram [`Celula::Ausente`].
    pub fn texto(valor: impl Into<String>) -> Self {
        let valor = valor.into();
        if valor.trim().is_empty() {
            Celula::Ausente
        } else {
            Celula::Texto(valor)
        }
    }

    /// `NaN` é tratado como valor ausente.
    pub fn numero(valor: f64) -> Self {
        if valor.is_nan() {
            Celula::Ausente
        } else {
            Celula::Numero(valor)
        }
    }
}

impl fmt::Display for Celula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Celula::Texto(texto) => write!(f, "{texto}"),
            Celula::Numero(numero) => write!(f, "{numero}"),
            Celula::Ausente => write!(f, ""),
        }
    }
}

impl From<&str> for Celula {
    fn from(valor: &str) -> Self {
        Celula::texto(valor)
    }
}

impl From<String> for Celula {
    fn from(valor: String) -> Self {
        Celula::texto(valor)
    }
}

impl From<f64> for Celula {
    fn from(valor: f64) -> Self {
        Celula::numero(valor)
    }
}

/// Inteiros são guardados como texto: `f64` perde dígitos acima de 2^53.
impl From<i64> for Celula {
    fn from(valor: i64) -> Self {
        Celula::Texto(valor.to_string())
    }
}

impl<T: Into<Celula>> From<Option<T>> for Celula {
    fn from(valor: Option<T>) -> Self {
        valor.map_or(Celula::Ausente, Into::into)
    }
}

/// Planilha já decodificada: nomes de colunas e linhas na ordem original.
///
/// Colunas extras são carregadas, mas ignoradas pelo processamento.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tabela {
    pub colunas: Vec<String>,
    pub linhas: Vec<Vec<Celula>>,
}

impl Tabela {
    pub fn new<S: Into<String>>(colunas: impl IntoIterator<Item = S>) -> Self {
        Tabela {
            colunas: colunas.into_iter().map(Into::into).collect(),
            linhas: Vec::new(),
        }
    }

    /// Acrescenta uma linha (builder).
    pub fn linha(mut self, celulas: impl IntoIterator<Item = Celula>) -> Self {
        self.linhas.push(celulas.into_iter().collect());
        self
    }

    /// Posição de uma coluna pelo nome exato.
    pub fn indice_da_coluna(&self, nome: &str) -> Option<usize> {
        self.colunas.iter().position(|col| col == nome)
    }

    /// Célula da linha `linha` na coluna `coluna`.
    /// Linhas mais curtas que o cabeçalho são lidas como [`Celula::Ausente`].
    pub fn celula(&self, linha: usize, coluna: usize) -> &Celula {
        self.linhas
            .get(linha)
            .and_then(|celulas| celulas.get(coluna))
            .unwrap_or(&AUSENTE)
    }

    pub fn len(&self) -> usize {
        self.linhas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.linhas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texto_em_branco_e_nan_viram_ausente() {
        assert_eq!(Celula::texto("   "), Celula::Ausente);
        assert_eq!(Celula::numero(f64::NAN), Celula::Ausente);
        assert_eq!(Celula::from(None::<&str>), Celula::Ausente);
        assert_eq!(Celula::from(Some(7_i64)), Celula::Texto("7".into()));
    }

    #[test]
    fn inteiro_grande_nao_perde_digitos() {
        let celula = Celula::from(9_007_199_254_740_993_i64);
        assert_eq!(celula, Celula::Texto("9007199254740993".into()));
        assert_eq!(
            crate::normalizar_patrimonio(&celula, 1).unwrap(),
            "9007199254740993"
        );
    }

    #[test]
    fn linha_curta_le_ausente() {
        let tabela = Tabela::new(["a", "b"]).linha([Celula::from("x")]);

        assert_eq!(tabela.indice_da_coluna("b"), Some(1));
        assert_eq!(tabela.indice_da_coluna("c"), None);
        assert_eq!(tabela.celula(0, 0), &Celula::Texto("x".into()));
        assert_eq!(tabela.celula(0, 1), &Celula::Ausente);
        assert_eq!(tabela.len(), 1);
    }
}
