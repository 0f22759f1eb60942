use serde::Serialize;
use std::{collections::BTreeMap, fmt};

use crate::{
    COLUNAS_OBRIGATORIAS, COLUNA_CLASSIFICACAO, COLUNA_PATRIMONIO, Etapa, Evento,
    LARGURA_PATRIMONIO, PatrimonioError, PatrimonioResult, RegistroDeEventos, Tabela,
    normalizar_classificacao, normalizar_patrimonio,
};

/// Nome de exibição de um bloco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RotuloBloco {
    /// A classificação inteira coube em um só bloco.
    Unico,
    /// Posição (base 1) do bloco entre vários.
    Numerado(usize),
}

impl fmt::Display for RotuloBloco {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotuloBloco::Unico => write!(f, "Bloco de Itens"),
            RotuloBloco::Numerado(n) => write!(f, "Bloco {n}"),
        }
    }
}

/// Fatia contígua dos patrimônios de uma classificação, com no máximo `limite` itens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bloco {
    pub rotulo: RotuloBloco,
    pub nome_bloco: String,
    pub itens: Vec<String>,
    /// Itens separados por `", "`, prontos para copiar.
    pub string_dados: String,
    pub contagem_itens: usize,
    /// Ex.: `2 de 5`.
    pub indice_total: String,
}

impl Bloco {
    fn new(itens: &[String], indice: usize, total_blocos: usize) -> Self {
        let rotulo = if total_blocos == 1 {
            RotuloBloco::Unico
        } else {
            RotuloBloco::Numerado(indice + 1)
        };

        Bloco {
            rotulo,
            nome_bloco: rotulo.to_string(),
            itens: itens.to_vec(),
            string_dados: itens.join(", "),
            contagem_itens: itens.len(),
            indice_total: format!("{} de {}", indice + 1, total_blocos),
        }
    }

    /// Identificação do bloco nos eventos: `ÚNICO` ou `k/n`.
    fn nome_no_log(&self, total_blocos: usize) -> String {
        match self.rotulo {
            RotuloBloco::Unico => "ÚNICO".to_string(),
            RotuloBloco::Numerado(n) => format!("{n}/{total_blocos}"),
        }
    }
}

/// Patrimônios de uma Classificação Contábil divididos em blocos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classificacao {
    pub total_itens_classificacao: usize,
    pub blocos: Vec<Bloco>,
}

/// Resultado do processamento: Classificação Contábil -> blocos.
///
/// As classificações ficam em ordem crescente de chave.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Resultado {
    pub classificacoes: BTreeMap<String, Classificacao>,
}

impl Resultado {
    pub fn len(&self) -> usize {
        self.classificacoes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classificacoes.is_empty()
    }

    pub fn get(&self, classificacao: &str) -> Option<&Classificacao> {
        self.classificacoes.get(classificacao)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Classificacao)> {
        self.classificacoes.iter()
    }

    pub fn total_itens(&self) -> usize {
        self.classificacoes
            .values()
            .map(|c| c.total_itens_classificacao)
            .sum()
    }

    pub fn total_blocos(&self) -> usize {
        self.classificacoes.values().map(|c| c.blocos.len()).sum()
    }
}

/// Agrupa os números de patrimônio por Classificação Contábil e divide cada grupo
/// em blocos de no máximo `limite_bloco` itens.
///
/// O processamento é tudo-ou-nada: o primeiro erro interrompe a execução e nenhum
/// resultado parcial é devolvido. Cada etapa é comunicada a `registro`.
///
/// ### Erros
/// - [`PatrimonioError::ColunasAusentes`]: falta `Classificacao_Contabil` ou `Numero_Patrimonio`.
/// - [`PatrimonioError::Configuracao`]: `limite_bloco` igual a zero.
/// - [`PatrimonioError::EntradaVazia`]: a planilha não tem linhas.
/// - [`PatrimonioError::Formato`] / [`PatrimonioError::Limpeza`]: valor não conversível.
///
/// ### Exemplo
/// ```
/// use transferencia_patrimonial::{Celula, RegistroEmMemoria, Tabela, processar_patrimonios};
///
/// let tabela = Tabela::new(["Classificacao_Contabil", "Numero_Patrimonio"])
///     .linha([Celula::from("A"), Celula::Numero(1.0)])
///     .linha([Celula::from("A"), Celula::from(2_i64)])
///     .linha([Celula::from("B"), Celula::from(3_i64)]);
///
/// let resultado = processar_patrimonios(&tabela, 2, &RegistroEmMemoria::new()).unwrap();
///
/// let a = resultado.get("A").unwrap();
/// assert_eq!(a.total_itens_classificacao, 2);
/// assert_eq!(a.blocos[0].string_dados, "000001, 000002");
/// assert_eq!(a.blocos[0].nome_bloco, "Bloco de Itens");
/// assert_eq!(resultado.get("B").unwrap().blocos[0].itens, ["000003"]);
/// ```
pub fn processar_patrimonios(
    tabela: &Tabela,
    limite_bloco: usize,
    registro: &dyn RegistroDeEventos,
) -> PatrimonioResult<Resultado> {
    let total_itens = tabela.len();

    registro.registrar(
        Evento::new(Etapa::Inicio)
            .campo("total_itens", total_itens)
            .campo("limite_bloco", limite_bloco),
    );

    // 1. Validação de colunas e do limite
    let (idx_classificacao, idx_patrimonio) =
        validar_entrada(tabela, limite_bloco).inspect_err(|e| {
            registro.registrar(Evento::new(Etapa::FalhaNaValidacao).campo("detalhe", e));
        })?;

    // 2. Número de Patrimônio com 6 dígitos
    let patrimonios: Vec<String> = (0..total_itens)
        .map(|i| normalizar_patrimonio(tabela.celula(i, idx_patrimonio), i + 1))
        .collect::<PatrimonioResult<_>>()
        .inspect_err(|e| registrar_erro_critico(registro, COLUNA_PATRIMONIO, e))?;

    registro.registrar(
        Evento::new(Etapa::FormatarPatrimonio)
            .campo("coluna", COLUNA_PATRIMONIO)
            .campo("largura", LARGURA_PATRIMONIO),
    );

    let longos = patrimonios
        .iter()
        .filter(|p| p.chars().count() > LARGURA_PATRIMONIO)
        .count();

    if longos > 0 {
        registro.registrar(
            Evento::new(Etapa::PatrimonioLongo)
                .campo("itens", longos)
                .campo("detalhe", "mantidos sem truncamento"),
        );
    }

    // 3. Limpeza da Classificação Contábil
    let classificacoes: Vec<String> = (0..total_itens)
        .map(|i| normalizar_classificacao(tabela.celula(i, idx_classificacao), i + 1))
        .collect::<PatrimonioResult<_>>()
        .inspect_err(|e| registrar_erro_critico(registro, COLUNA_CLASSIFICACAO, e))?;

    registro.registrar(
        Evento::new(Etapa::LimparClassificacao).campo("coluna", COLUNA_CLASSIFICACAO),
    );

    // 4. Agrupamento estável: a ordem das linhas é mantida dentro de cada grupo
    let grupos = classificacoes.into_iter().zip(patrimonios).fold(
        BTreeMap::<String, Vec<String>>::new(),
        |mut acc, (classificacao, patrimonio)| {
            acc.entry(classificacao).or_default().push(patrimonio);
            acc
        },
    );

    registro.registrar(
        Evento::new(Etapa::Agrupamento).campo("classificacoes_unicas", grupos.len()),
    );

    // 5. Divisão em blocos
    let classificacoes = grupos
        .into_iter()
        .map(|(chave, lista)| {
            let classificacao = dividir_em_blocos(&chave, &lista, limite_bloco, registro);
            (chave, classificacao)
        })
        .collect();

    registro.registrar(Evento::new(Etapa::Fim).campo(
        "detalhe",
        "processamento de todos os grupos concluído",
    ));

    Ok(Resultado { classificacoes })
}

/// Verifica as colunas obrigatórias e o limite do bloco.
/// Retorna as posições de (classificação, patrimônio).
fn validar_entrada(tabela: &Tabela, limite_bloco: usize) -> PatrimonioResult<(usize, usize)> {
    let ausentes: Vec<String> = COLUNAS_OBRIGATORIAS
        .iter()
        .filter(|&&coluna| tabela.indice_da_coluna(coluna).is_none())
        .map(|coluna| coluna.to_string())
        .collect();

    if !ausentes.is_empty() {
        return Err(PatrimonioError::ColunasAusentes { ausentes });
    }

    if limite_bloco == 0 {
        return Err(PatrimonioError::Configuracao(
            "o limite de bens por bloco deve ser um inteiro positivo".to_string(),
        ));
    }

    if tabela.is_empty() {
        return Err(PatrimonioError::EntradaVazia);
    }

    let posicao = |coluna: &str| {
        tabela
            .indice_da_coluna(coluna)
            .ok_or_else(|| PatrimonioError::ColunasAusentes {
                ausentes: vec![coluna.to_string()],
            })
    };

    Ok((posicao(COLUNA_CLASSIFICACAO)?, posicao(COLUNA_PATRIMONIO)?))
}

fn registrar_erro_critico(registro: &dyn RegistroDeEventos, coluna: &str, e: &PatrimonioError) {
    registro.registrar(
        Evento::new(Etapa::ErroCritico)
            .campo("coluna", coluna)
            .campo("detalhe", e),
    );
}

/// Divide a lista de uma classificação em blocos consecutivos de até `limite_bloco` itens.
/// Só o último bloco pode ser menor que o limite.
fn dividir_em_blocos(
    chave: &str,
    lista: &[String],
    limite_bloco: usize,
    registro: &dyn RegistroDeEventos,
) -> Classificacao {
    let total_blocos = lista.len().div_ceil(limite_bloco);
    let chave_log = chave.to_uppercase();

    registro.registrar(
        Evento::new(Etapa::ProcessarClassificacao)
            .campo("classificacao", &chave_log)
            .campo("itens", lista.len())
            .campo("blocos", total_blocos),
    );

    let blocos = lista
        .chunks(limite_bloco)
        .enumerate()
        .map(|(indice, itens)| {
            let bloco = Bloco::new(itens, indice, total_blocos);
            registro.registrar(
                Evento::new(Etapa::GerarBloco)
                    .campo("classificacao", &chave_log)
                    .campo("bloco", bloco.nome_no_log(total_blocos))
                    .campo("itens", bloco.contagem_itens),
            );
            bloco
        })
        .collect();

    Classificacao {
        total_itens_classificacao: lista.len(),
        blocos,
    }
}
