use regex::Regex;
use std::sync::LazyLock;

/// Sufixo `.0` deixado por códigos de classificação lidos como número decimal.
/// Ancorado no fim da string: `12.0` -> `12`, mas `12.05` permanece.
pub static RE_SUFIXO_PONTO_ZERO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.0$").unwrap());

// Regex para nomes de arquivo de exportação
pub static RE_ESPACOS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s").unwrap());
pub static RE_SEPARADOR_CAMINHO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[/\\]").unwrap());
