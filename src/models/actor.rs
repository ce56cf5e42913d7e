use uuid::Uuid;

/// Usuario autenticado que ejecuta una operación.
///
/// Se construye a partir del token verificado y se pasa explícitamente
/// a cada operación que modifica datos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl Actor {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id, email: None }
    }
}
