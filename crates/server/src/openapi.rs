use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct NuevoClienteDoc {
    pub numero_cliente: i32,
    pub dni: i32,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
}

#[derive(utoipa::ToSchema)]
pub struct ClienteDoc {
    pub numero_cliente: i32,
    pub dni: i32,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
}

#[derive(utoipa::ToSchema)]
pub struct FacturaDraftDoc {
    pub numero_factura: i32,
    pub fecha_emision: String,
    pub fecha_vencimiento: String,
    pub consumo_mensual: f64,
    pub consumo_total: f64,
    pub numero_medidor: i32,
    pub cliente_dni: Option<i32>,
}

#[derive(utoipa::ToSchema)]
pub struct FacturaPatchDoc {
    pub fecha_vencimiento: String,
    pub consumo_mensual: f64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::clientes::list,
        crate::routes::clientes::self_profile,
        crate::routes::clientes::create,
        crate::routes::clientes::update,
        crate::routes::clientes::delete,
        crate::routes::facturas::create,
        crate::routes::facturas::list,
        crate::routes::facturas::get_one,
        crate::routes::facturas::by_cliente,
        crate::routes::facturas::by_medidor,
        crate::routes::facturas::update,
        crate::routes::facturas::delete,
        crate::routes::fotos::upload,
        crate::routes::fotos::fetch,
    ),
    components(
        schemas(
            HealthResponse,
            NuevoClienteDoc,
            ClienteDoc,
            FacturaDraftDoc,
            FacturaPatchDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "clients"),
        (name = "invoices"),
        (name = "profile-photo")
    )
)]
pub struct ApiDoc;
