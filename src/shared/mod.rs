// src/shared/mod.rs

// Declara o submódulo com a resposta genérica da API
pub mod shared_structs;
// Declara o submódulo com a taxonomia de erros da API
pub mod erros;
// Declara o submódulo com as validações puras de campos
pub mod validacoes;
