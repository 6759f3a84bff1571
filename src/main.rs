// src/main.rs

use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing_subscriber::EnvFilter;

// Importa os módulos
//
// O Rust encontrará o arquivo `src/<modulo>/mod.rs` e, a partir dele, os submódulos.
mod carrinho;   // Módulo do carrinho de compras
mod categorias; // Módulo de categorias
mod pedidos;    // Módulo de pedidos
mod produtos;   // Módulo de produtos
mod shared;     // Módulo shared
mod usuarios;   // Módulo de usuários

// Estado compartilhado que contém a conexão com o banco de dados e a chave secreta JWT.
pub struct AppState {
    pub db_pool: Pool<Postgres>,
    pub jwt_secret: String, // Chave secreta para JWT
}

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // A coluna 'preco' (e os demais valores monetários) usam NUMERIC no
    // PostgreSQL, compatível com bigdecimal::BigDecimal.
    let database_url =
        std::env::var("DATABASE_URL").expect("variável de ambiente DATABASE_URL não definida");
    let jwt_secret =
        std::env::var("JWT_SECRET").expect("variável de ambiente JWT_SECRET não definida");
    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    // Conecta ao banco de dados PostgreSQL usando um pool de conexões.
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Falha ao conectar ao banco PostgreSQL");

    sqlx::migrate!()
        .run(&db_pool)
        .await
        .expect("Falha ao executar as migrações do banco");

    // Garante o administrador principal a partir das variáveis de ambiente.
    usuarios::admin::criar_admin_principal(&db_pool).await;

    // Cria um estado compartilhado da aplicação com o pool de conexões.
    // web::Data é usado para compartilhar dados imutáveis entre as rotas.
    let app_state = web::Data::new(AppState { db_pool, jwt_secret });

    tracing::info!(%bind_addr, "iniciando API Vitrine");

    // Configura e inicia o servidor HTTP.
    HttpServer::new(move || {
        App::new()
            // Adiciona o estado compartilhado à aplicação.
            // .clone() é necessário porque a closure é movida
            // e pode ser executada várias vezes.
            .app_data(app_state.clone())

            // Módulo de Usuários
            .service(usuarios::usuario_router::registrar_usuario)
            .service(usuarios::usuario_router::login_usuario)

            // Módulo de Categorias
            .service(categorias::categoria_router::listar_categorias)
            .service(categorias::categoria_router::obter_categoria_por_id)
            .service(categorias::categoria_router::cadastrar_categoria)
            .service(categorias::categoria_router::atualizar_categoria)
            .service(categorias::categoria_router::deletar_categoria)

            // Módulo de Produtos
            // As rotas com segmento fixo vêm antes da rota com {id}.
            .service(produtos::produtos_router::listar_produtos)
            .service(produtos::produtos_router::buscar_produtos_por_nome)
            .service(produtos::produtos_router::listar_promocoes)
            .service(produtos::produtos_router::listar_mais_vendidos)
            .service(produtos::produtos_router::listar_por_categoria)
            .service(produtos::produtos_router::cadastrar_produto)
            .service(produtos::produtos_router::definir_promocao)
            .service(produtos::produtos_router::atualizar_produto)
            .service(produtos::produtos_router::deletar_produto)
            .service(produtos::produtos_router::obter_produto_por_id)

            // Módulo do Carrinho
            .service(carrinho::carrinho_router::obter_carrinho)
            .service(carrinho::carrinho_router::adicionar_item)
            .service(carrinho::carrinho_router::atualizar_quantidade)
            .service(carrinho::carrinho_router::remover_item)
            .service(carrinho::carrinho_router::limpar_carrinho)

            // Módulo de Pedidos
            .service(pedidos::pedido_router::criar_pedido)
            .service(pedidos::pedido_router::listar_pedidos)
            .service(pedidos::pedido_router::listar_pedidos_por_status)
            .service(pedidos::pedido_router::obter_pedido_por_numero)
            .service(pedidos::pedido_router::atualizar_status)
            .service(pedidos::pedido_router::cancelar_pedido)
            .service(pedidos::pedido_router::obter_pedido_por_id)
    })
    // Vincula o servidor ao endereço IP e porta. O '?' propaga erros.
    .bind(&bind_addr)?
    // Inicia o servidor.
    .run()
    // Aguarda a finalização do servidor.
    .await
}
