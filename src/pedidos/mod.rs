// src/pedidos/mod.rs

// Declara o submódulo que contém as definições das structs de pedidos
pub mod pedido_structs;
// Declara o submódulo com as regras puras de pedidos
pub mod regras;
// Declara o submódulo que contém as funções de rota de pedidos
pub mod pedido_router;
