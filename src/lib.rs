mod args;
mod error;
mod leitura;
mod metadata;
mod normalizar;
mod regex;
mod registro;
mod saida;
mod tabela;
mod transferencia;

pub use self::{
    args::*, error::*, leitura::*, metadata::*, normalizar::*, regex::*, registro::*, saida::*,
    tabela::*, transferencia::*,
};
