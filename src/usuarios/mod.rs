// src/usuarios/mod.rs

// Declara o submódulo que contém as definições das structs de usuários
pub mod usuario_structs;
// Declara o submódulo que contém as funções de rota relacionadas a usuários
pub mod usuario_router;
// Declara o submódulo para o middleware de autenticação
pub mod auth_middleware;
// Declara o submódulo do bootstrap do administrador principal
pub mod admin;
