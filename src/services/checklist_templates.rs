//! Catálogo de checklists por tipo de servicio
//!
//! La definición del checklist vive aquí; las instancias
//! (`ServiceChecklistItem`) pertenecen a cada servicio.

use serde::Serialize;
use uuid::Uuid;

use crate::models::ServiceChecklistItem;

pub const TRANSFER_SERVICE_TYPE: &str = "TRANSFERENCIA";

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistTemplate {
    pub service_type: &'static str,
    pub tasks: &'static [&'static str],
}

const TEMPLATES: &[ChecklistTemplate] = &[
    ChecklistTemplate {
        service_type: TRANSFER_SERVICE_TYPE,
        tasks: &[
            "Receber CRV assinado e com firma reconhecida",
            "Conferir documentos do comprador e do vendedor",
            "Emitir e quitar guia de transferência",
            "Realizar vistoria veicular",
            "Protocolar processo no DETRAN",
            "Entregar CRLV ao novo proprietário",
        ],
    },
    ChecklistTemplate {
        service_type: "LICENCIAMENTO",
        tasks: &[
            "Consultar débitos (IPVA, multas, licenciamento)",
            "Emitir guias de pagamento",
            "Confirmar quitação",
            "Emitir CRLV-e",
        ],
    },
    ChecklistTemplate {
        service_type: "PRIMEIRO_EMPLACAMENTO",
        tasks: &[
            "Receber nota fiscal do veículo",
            "Conferir documentos do proprietário",
            "Emitir guias de emplacamento",
            "Agendar vistoria",
            "Estampar e instalar placas",
            "Entregar CRV e CRLV",
        ],
    },
    ChecklistTemplate {
        service_type: "SEGUNDA_VIA_CRV",
        tasks: &[
            "Registrar boletim de ocorrência",
            "Emitir guia de segunda via",
            "Protocolar pedido no DETRAN",
            "Retirar documento",
        ],
    },
    ChecklistTemplate {
        service_type: "BAIXA_GRAVAME",
        tasks: &[
            "Obter carta de quitação da financeira",
            "Confirmar baixa no sistema",
            "Emitir novo CRV",
        ],
    },
    ChecklistTemplate {
        service_type: "ALTERACAO_CARACTERISTICA",
        tasks: &[
            "Obter autorização prévia",
            "Emitir certificado de segurança veicular",
            "Realizar vistoria",
            "Protocolar alteração no DETRAN",
            "Entregar novo CRLV",
        ],
    },
];

const GENERIC_TASKS: &[&str] = &[
    "Receber documentos do cliente",
    "Protocolar no DETRAN",
    "Entregar documento final",
];

/// "Segunda via crv" → "SEGUNDA_VIA_CRV"
pub fn normalize_service_type(service_type: &str) -> String {
    service_type
        .trim()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}

pub fn all_templates() -> &'static [ChecklistTemplate] {
    TEMPLATES
}

/// Tareas del tipo de servicio; los tipos desconocidos reciben el checklist genérico
pub fn tasks_for(service_type: &str) -> &'static [&'static str] {
    let normalized = normalize_service_type(service_type);
    TEMPLATES
        .iter()
        .find(|template| template.service_type == normalized)
        .map(|template| template.tasks)
        .unwrap_or(GENERIC_TASKS)
}

/// Instancia los items del checklist para un servicio, en orden
pub fn instantiate(service_id: Uuid, service_type: &str) -> Vec<ServiceChecklistItem> {
    tasks_for(service_type)
        .iter()
        .enumerate()
        .map(|(position, task)| ServiceChecklistItem::new(service_id, task.to_string(), position as i32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_service_type() {
        assert_eq!(normalize_service_type(" segunda via-crv "), "SEGUNDA_VIA_CRV");
        assert_eq!(normalize_service_type("Transferencia"), "TRANSFERENCIA");
    }

    #[test]
    fn test_known_and_unknown_types() {
        assert_eq!(tasks_for("licenciamento").len(), 4);
        assert_eq!(tasks_for("algo novo"), GENERIC_TASKS);
    }

    #[test]
    fn test_instantiate_preserves_order() {
        let service_id = Uuid::new_v4();
        let items = instantiate(service_id, TRANSFER_SERVICE_TYPE);
        assert_eq!(items.len(), 6);
        assert!(items.iter().all(|item| item.service_id == service_id && !item.completed));
        assert_eq!(items[0].position, 0);
        assert_eq!(items[5].position, 5);
        assert_eq!(items[3].description, "Realizar vistoria veicular");
    }
}
