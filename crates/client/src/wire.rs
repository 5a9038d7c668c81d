//! Wire-format DTOs for the helpdesk REST API
//!
//! The backend speaks Portuguese field names; the engine speaks the domain
//! types. Conversions live here so normalization (status/priority labels,
//! history ordering) happens exactly once, at ingestion.

use chrono::{DateTime, Utc};
use helpdesk_domain::{
    AnalystLoad, Attachment, Category, DashboardStats, HistoryItem, Priority, Technician, Ticket,
    TicketPriority, TicketStatus,
};
use serde::{Deserialize, Serialize};

/// Attachment metadata as the server sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDto {
    pub id: i64,
    pub nome_arquivo: String,
    pub tipo_arquivo: String,
}

/// One history entry as the server sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItemDto {
    pub autor: String,
    pub comentario: String,
    pub data_ocorrencia: DateTime<Utc>,
}

/// Ticket record as the server sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDto {
    pub id: i64,
    pub numero_chamado: String,
    pub nome_solicitante: String,
    pub descricao: String,
    pub categoria: String,
    pub prioridade: String,
    pub status: String,
    pub data_abertura: DateTime<Utc>,
    #[serde(default)]
    pub data_fechamento: Option<DateTime<Utc>>,
    #[serde(default)]
    pub nome_tecnico_atribuido: Option<String>,
    #[serde(default)]
    pub solucao: Option<String>,
    #[serde(default)]
    pub historico: Vec<HistoryItemDto>,
    #[serde(default)]
    pub foi_reaberto: bool,
    #[serde(default)]
    pub anexos: Vec<AttachmentDto>,
}

impl From<AttachmentDto> for Attachment {
    fn from(dto: AttachmentDto) -> Self {
        Self { id: dto.id, file_name: dto.nome_arquivo, content_type: dto.tipo_arquivo }
    }
}

impl From<&Attachment> for AttachmentDto {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: attachment.id,
            nome_arquivo: attachment.file_name.clone(),
            tipo_arquivo: attachment.content_type.clone(),
        }
    }
}

impl From<HistoryItemDto> for HistoryItem {
    fn from(dto: HistoryItemDto) -> Self {
        Self { author: dto.autor, comment: dto.comentario, occurred_at: dto.data_ocorrencia }
    }
}

impl From<TicketDto> for Ticket {
    fn from(dto: TicketDto) -> Self {
        let mut history: Vec<HistoryItem> =
            dto.historico.into_iter().map(HistoryItem::from).collect();
        // Most recent first, regardless of the order the server delivered.
        history.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));

        Self {
            id: dto.id,
            number: dto.numero_chamado,
            requester: dto.nome_solicitante,
            description: dto.descricao,
            category: dto.categoria,
            priority: TicketPriority::parse(&dto.prioridade),
            priority_label: dto.prioridade,
            status: TicketStatus::parse(&dto.status),
            status_label: dto.status,
            opened_at: dto.data_abertura,
            closed_at: dto.data_fechamento,
            assigned_to: dto.nome_tecnico_atribuido,
            solution: dto.solucao,
            history,
            reopened: dto.foi_reaberto,
            attachments: dto.anexos.into_iter().map(Attachment::from).collect(),
        }
    }
}

impl From<&Ticket> for TicketDto {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            numero_chamado: ticket.number.clone(),
            nome_solicitante: ticket.requester.clone(),
            descricao: ticket.description.clone(),
            categoria: ticket.category.clone(),
            prioridade: ticket.priority_label.clone(),
            status: ticket.status_label.clone(),
            data_abertura: ticket.opened_at,
            data_fechamento: ticket.closed_at,
            nome_tecnico_atribuido: ticket.assigned_to.clone(),
            solucao: ticket.solution.clone(),
            historico: ticket
                .history
                .iter()
                .map(|item| HistoryItemDto {
                    autor: item.author.clone(),
                    comentario: item.comment.clone(),
                    data_ocorrencia: item.occurred_at,
                })
                .collect(),
            foi_reaberto: ticket.reopened,
            anexos: ticket.attachments.iter().map(AttachmentDto::from).collect(),
        }
    }
}

/// The list endpoint answers a Spring page envelope with a `content` array,
/// but older deployments returned a bare array; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TicketListDto {
    Page { content: Vec<TicketDto> },
    Plain(Vec<TicketDto>),
}

impl TicketListDto {
    #[must_use]
    pub fn into_tickets(self) -> Vec<Ticket> {
        let dtos = match self {
            Self::Page { content } => content,
            Self::Plain(dtos) => dtos,
        };
        dtos.into_iter().map(Ticket::from).collect()
    }
}

/// Reference entity (categories, priorities) as the server sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRefDto {
    pub id: i64,
    pub nome: String,
}

impl From<NamedRefDto> for Category {
    fn from(dto: NamedRefDto) -> Self {
        Self { id: dto.id, name: dto.nome }
    }
}

impl From<NamedRefDto> for Priority {
    fn from(dto: NamedRefDto) -> Self {
        Self { id: dto.id, name: dto.nome }
    }
}

impl From<NamedRefDto> for Technician {
    fn from(dto: NamedRefDto) -> Self {
        Self { id: dto.id, name: dto.nome }
    }
}

/// Body for the administrative create-category/create-priority calls.
#[derive(Debug, Serialize)]
pub struct CreateNamedRefDto<'a> {
    pub nome: &'a str,
}

/// Per-analyst load row inside the dashboard snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystLoadDto {
    pub nome_analista: String,
    pub total_chamados: u64,
}

/// Dashboard aggregate snapshot as the server sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsDto {
    pub chamados_na_fila: u64,
    #[serde(default)]
    pub chamados_por_analista: Vec<AnalystLoadDto>,
    #[serde(default)]
    pub chamados_sla_violado: Vec<TicketDto>,
}

impl From<DashboardStatsDto> for DashboardStats {
    fn from(dto: DashboardStatsDto) -> Self {
        Self {
            queue_size: dto.chamados_na_fila,
            per_analyst: dto
                .chamados_por_analista
                .into_iter()
                .map(|row| AnalystLoad { analyst: row.nome_analista, total: row.total_chamados })
                .collect(),
            sla_violated: dto.chamados_sla_violado.into_iter().map(Ticket::from).collect(),
        }
    }
}

/// Login request body.
#[derive(Debug, Serialize)]
pub struct LoginRequestDto<'a> {
    pub email: &'a str,
    pub senha: &'a str,
}

/// Token pair answered by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairDto {
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh / revoke request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequestDto<'a> {
    pub refresh_token: &'a str,
}

/// JSON part of the multipart create-ticket request.
#[derive(Debug, Serialize)]
pub struct TicketCreateDto<'a> {
    pub description: &'a str,
    pub category: &'a str,
    pub priority: &'a str,
}

/// Body for adding a comment.
#[derive(Debug, Serialize)]
pub struct CommentRequestDto<'a> {
    pub comentario: &'a str,
}

/// Body for closing a ticket with its resolution text.
#[derive(Debug, Serialize)]
pub struct CloseRequestDto<'a> {
    pub solucao: &'a str,
}

/// Body for reopening a ticket with a reason.
#[derive(Debug, Serialize)]
pub struct ReopenRequestDto<'a> {
    pub motivo: &'a str,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn sample_dto() -> TicketDto {
        serde_json::from_value(json!({
            "id": 42,
            "numeroChamado": "CH-2024-0042",
            "nomeSolicitante": "Bruno Lima",
            "descricao": "Impressora sem rede",
            "categoria": "Infraestrutura",
            "prioridade": "Alta",
            "status": "Em Andamento",
            "dataAbertura": "2024-05-02T08:30:00Z",
            "dataFechamento": null,
            "nomeTecnicoAtribuido": "Carla Dias",
            "solucao": null,
            "foiReaberto": true,
            "historico": [
                { "autor": "Carla Dias", "comentario": "Verificando switch", "dataOcorrencia": "2024-05-02T09:00:00Z" },
                { "autor": "Bruno Lima", "comentario": "Chamado aberto", "dataOcorrencia": "2024-05-02T08:30:00Z" },
            ],
            "anexos": [
                { "id": 7, "nomeArquivo": "foto.png", "tipoArquivo": "image/png" },
            ],
        }))
        .unwrap()
    }

    #[test]
    fn maps_into_domain_ticket() {
        let ticket = Ticket::from(sample_dto());
        assert_eq!(ticket.number, "CH-2024-0042");
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.priority, TicketPriority::High);
        assert_eq!(ticket.assigned_to.as_deref(), Some("Carla Dias"));
        assert!(ticket.reopened);
        assert_eq!(ticket.attachments.len(), 1);
        assert_eq!(ticket.attachments[0].file_name, "foto.png");
    }

    #[test]
    fn history_is_sorted_most_recent_first_regardless_of_input_order() {
        let mut dto = sample_dto();
        dto.historico.reverse(); // oldest first on the wire
        let ticket = Ticket::from(dto);

        let first = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
        assert_eq!(ticket.history[0].occurred_at, first);
        assert_eq!(ticket.history[1].occurred_at, second);
    }

    #[test]
    fn round_trip_preserves_wire_fields() {
        let dto = sample_dto();
        let ticket = Ticket::from(dto.clone());
        let back = TicketDto::from(&ticket);

        assert_eq!(back.id, dto.id);
        assert_eq!(back.numero_chamado, dto.numero_chamado);
        assert_eq!(back.nome_solicitante, dto.nome_solicitante);
        assert_eq!(back.categoria, dto.categoria);
        assert_eq!(back.prioridade, dto.prioridade);
        assert_eq!(back.status, dto.status);
        assert_eq!(back.data_abertura, dto.data_abertura);
        assert_eq!(back.data_fechamento, dto.data_fechamento);
        assert_eq!(back.anexos.len(), dto.anexos.len());
        assert_eq!(back.anexos[0].nome_arquivo, dto.anexos[0].nome_arquivo);
    }

    #[test]
    fn list_accepts_page_envelope_and_bare_array() {
        let page: TicketListDto = serde_json::from_value(json!({
            "content": [serde_json::to_value(sample_dto()).unwrap()],
            "totalElements": 1,
        }))
        .unwrap();
        assert_eq!(page.into_tickets().len(), 1);

        let plain: TicketListDto =
            serde_json::from_value(json!([serde_json::to_value(sample_dto()).unwrap()])).unwrap();
        assert_eq!(plain.into_tickets().len(), 1);
    }

    #[test]
    fn dashboard_stats_map_into_domain() {
        let dto: DashboardStatsDto = serde_json::from_value(json!({
            "chamadosNaFila": 12,
            "chamadosPorAnalista": [
                { "nomeAnalista": "Carla Dias", "totalChamados": 5 },
            ],
            "chamadosSlaViolado": [],
        }))
        .unwrap();
        let stats = DashboardStats::from(dto);
        assert_eq!(stats.queue_size, 12);
        assert_eq!(stats.per_analyst[0].analyst, "Carla Dias");
        assert_eq!(stats.per_analyst[0].total, 5);
    }
}
