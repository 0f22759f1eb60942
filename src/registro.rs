use std::{
    fmt,
    fs::OpenOptions,
    path::Path,
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Etapas do processamento reportadas ao registro de eventos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Etapa {
    Inicio,
    FalhaNaValidacao,
    FormatarPatrimonio,
    PatrimonioLongo,
    LimparClassificacao,
    ErroCritico,
    Agrupamento,
    ProcessarClassificacao,
    GerarBloco,
    Fim,
}

impl fmt::Display for Etapa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nome = match self {
            Etapa::Inicio => "INÍCIO DO PROCESSO",
            Etapa::FalhaNaValidacao => "FALHA NA VALIDAÇÃO",
            Etapa::FormatarPatrimonio => "FORMATAR PATRIMÔNIO",
            Etapa::PatrimonioLongo => "PATRIMÔNIO LONGO",
            Etapa::LimparClassificacao => "LIMPAR CLASSIFICAÇÃO",
            Etapa::ErroCritico => "ERRO CRÍTICO",
            Etapa::Agrupamento => "AGRUPAMENTO",
            Etapa::ProcessarClassificacao => "PROCESSAR CLASSIFICAÇÃO",
            Etapa::GerarBloco => "GERAR BLOCO",
            Etapa::Fim => "FIM DO PROCESSO",
        };
        write!(f, "{nome}")
    }
}

/// Um evento: a etapa e seus campos (nome, valor) na ordem em que foram informados.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evento {
    pub etapa: Etapa,
    pub campos: Vec<(&'static str, String)>,
}

impl Evento {
    pub fn new(etapa: Etapa) -> Self {
        Evento {
            etapa,
            campos: Vec::new(),
        }
    }

    /// Acrescenta um campo (builder).
    pub fn campo(mut self, nome: &'static str, valor: impl ToString) -> Self {
        self.campos.push((nome, valor.to_string()));
        self
    }

    /// Valor de um campo pelo nome.
    pub fn valor(&self, nome: &str) -> Option<&str> {
        self.campos
            .iter()
            .find(|(chave, _)| *chave == nome)
            .map(|(_, valor)| valor.as_str())
    }
}

/// `Ação: AGRUPAMENTO | classificacoes_unicas: 3`
impl fmt::Display for Evento {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ação: {}", self.etapa)?;
        for (nome, valor) in &self.campos {
            write!(f, " | {nome}: {valor}")?;
        }
        Ok(())
    }
}

/// Destino dos eventos emitidos durante o processamento.
pub trait RegistroDeEventos {
    fn registrar(&self, evento: Evento);
}

/// Encaminha os eventos para o `tracing`, com nível conforme a etapa.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistroTracing;

impl RegistroDeEventos for RegistroTracing {
    fn registrar(&self, evento: Evento) {
        match evento.etapa {
            Etapa::FalhaNaValidacao | Etapa::ErroCritico => tracing::error!("{evento}"),
            Etapa::PatrimonioLongo => tracing::warn!("{evento}"),
            _ => tracing::info!("{evento}"),
        }
    }
}

/// Guarda os eventos em memória, na ordem de chegada.
#[derive(Debug, Default)]
pub struct RegistroEmMemoria {
    eventos: Mutex<Vec<Evento>>,
}

impl RegistroEmMemoria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cópia dos eventos registrados até o momento.
    pub fn eventos(&self) -> Vec<Evento> {
        self.eventos
            .lock()
            .map(|eventos| eventos.clone())
            .unwrap_or_default()
    }

    pub fn etapas(&self) -> Vec<Etapa> {
        self.eventos().iter().map(|evento| evento.etapa).collect()
    }
}

impl RegistroDeEventos for RegistroEmMemoria {
    fn registrar(&self, evento: Evento) {
        if let Ok(mut eventos) = self.eventos.lock() {
            eventos.push(evento);
        }
    }
}

/// Inicializa o `tracing-subscriber`: console compacto (stderr) e, opcionalmente, arquivo de log.
///
/// `RUST_LOG` tem precedência sobre o nível escolhido por `verbose`.
/// Se o arquivo não puder ser aberto, o log segue apenas no console.
pub fn init_logger(verbose: bool, arquivo_log: Option<&Path>) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("transferencia_patrimonial=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("transferencia_patrimonial=info"))
    };

    let mut falha_no_arquivo = None;

    let camada_arquivo = arquivo_log.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            ),
            Err(e) => {
                falha_no_arquivo = Some(format!("{}: {e}", path.display()));
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .with(camada_arquivo)
        .init();

    if let Some(detalhe) = falha_no_arquivo {
        tracing::warn!("Não foi possível criar o arquivo de log: {detalhe}");
    }
}
