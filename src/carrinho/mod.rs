// src/carrinho/mod.rs

// Declara o submódulo que contém as definições das structs do carrinho
pub mod carrinho_structs;
// Declara o submódulo com as regras puras do carrinho
pub mod regras;
// Declara o submódulo que contém as funções de rota do carrinho
pub mod carrinho_router;
