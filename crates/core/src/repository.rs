//! Ticket repository
//!
//! Owns the client-side mirror of the server's ticket collection plus the
//! reference data around it (categories, priorities, technicians, dashboard
//! snapshot). Reads are best-effort: a failing fetch leaves an empty
//! collection and a [`SyncStatus::Failed`] marker instead of an error.
//! Writes propagate their failures and, on success, resync against the
//! server so the local mirror never drifts into a locally reconciled state.

use std::sync::Arc;

use helpdesk_client::wire::{
    CloseRequestDto, CommentRequestDto, CreateNamedRefDto, DashboardStatsDto, NamedRefDto,
    ReopenRequestDto, TicketCreateDto, TicketDto, TicketListDto,
};
use helpdesk_client::{ApiClient, MultipartPart};
use helpdesk_domain::{
    Category, DashboardStats, HelpdeskError, NewTicket, Priority, Result, Technician, Ticket,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Outcome of the most recent full sync, letting callers tell a genuinely
/// empty server collection apart from a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// No sync has been attempted yet.
    Never,
    /// The last sync succeeded; the collection mirrors the server.
    Synced,
    /// The last sync failed; the collection is empty, not authoritative.
    Failed,
}

/// Client-side mirror of the server's ticket state.
pub struct TicketRepository {
    api: Arc<ApiClient>,
    page_size: usize,
    tickets: RwLock<Vec<Ticket>>,
    active: RwLock<Option<Ticket>>,
    sync: RwLock<SyncStatus>,
    categories: RwLock<Vec<Category>>,
    priorities: RwLock<Vec<Priority>>,
    technicians: RwLock<Vec<Technician>>,
    stats: RwLock<Option<DashboardStats>>,
}

impl TicketRepository {
    #[must_use]
    pub fn new(api: Arc<ApiClient>, page_size: usize) -> Self {
        Self {
            api,
            page_size,
            tickets: RwLock::new(Vec::new()),
            active: RwLock::new(None),
            sync: RwLock::new(SyncStatus::Never),
            categories: RwLock::new(Vec::new()),
            priorities: RwLock::new(Vec::new()),
            technicians: RwLock::new(Vec::new()),
            stats: RwLock::new(None),
        }
    }

    // Snapshot accessors. Reports take these by value so projections run
    // over a stable copy.

    pub async fn tickets(&self) -> Vec<Ticket> {
        self.tickets.read().await.clone()
    }

    pub async fn active(&self) -> Option<Ticket> {
        self.active.read().await.clone()
    }

    pub async fn sync_status(&self) -> SyncStatus {
        *self.sync.read().await
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.categories.read().await.clone()
    }

    pub async fn priorities(&self) -> Vec<Priority> {
        self.priorities.read().await.clone()
    }

    pub async fn technicians(&self) -> Vec<Technician> {
        self.technicians.read().await.clone()
    }

    pub async fn dashboard_stats(&self) -> Option<DashboardStats> {
        self.stats.read().await.clone()
    }

    /// Refetch the full ticket collection. Best-effort: on failure the
    /// collection is emptied and the sync marker set to
    /// [`SyncStatus::Failed`].
    pub async fn fetch_all(&self) {
        let path = format!("/api/tickets?size={}", self.page_size);
        match self.api.get_json::<TicketListDto>(&path).await {
            Ok(list) => {
                let tickets = list.into_tickets();
                debug!(count = tickets.len(), "ticket collection synced");
                *self.tickets.write().await = tickets;
                *self.sync.write().await = SyncStatus::Synced;
            }
            Err(err) => {
                warn!(error = %err, "ticket sync failed, clearing collection");
                self.tickets.write().await.clear();
                *self.sync.write().await = SyncStatus::Failed;
            }
        }
    }

    /// Fetch one ticket and make it the active ticket.
    ///
    /// # Errors
    /// Unlike [`Self::fetch_all`] this propagates failures: the caller asked
    /// for a specific record and deserves to know it could not be loaded.
    pub async fn fetch_by_id(&self, id: i64) -> Result<Ticket> {
        let ticket: Ticket =
            self.api.get_json::<TicketDto>(&format!("/api/tickets/{id}")).await?.into();
        *self.active.write().await = Some(ticket.clone());
        Ok(ticket)
    }

    /// Create a ticket with optional attachments.
    ///
    /// The request is multipart: a `ticket` JSON part plus one `anexos` part
    /// per attachment. The server's record becomes the active ticket and the
    /// collection is resynced, same as every other mutation.
    ///
    /// # Errors
    /// Write failures always propagate.
    pub async fn create(&self, new_ticket: &NewTicket) -> Result<Ticket> {
        let payload = TicketCreateDto {
            description: &new_ticket.description,
            category: &new_ticket.category,
            priority: &new_ticket.priority,
        };
        let mut parts = vec![MultipartPart {
            name: "ticket".to_string(),
            file_name: None,
            content_type: "application/json".to_string(),
            bytes: serde_json::to_vec(&payload)
                .map_err(|err| HelpdeskError::Decode(format!("ticket payload: {err}")))?,
        }];
        for attachment in &new_ticket.attachments {
            parts.push(MultipartPart {
                name: "anexos".to_string(),
                file_name: Some(attachment.file_name.clone()),
                content_type: attachment.content_type.clone(),
                bytes: attachment.bytes.clone(),
            });
        }

        let created: Ticket = self.api.post_multipart::<TicketDto>("/api/tickets", &parts).await?.into();
        info!(number = %created.number, "ticket created");
        self.adopt_mutation(created.clone()).await;
        Ok(created)
    }

    /// Assign the ticket to the calling technician.
    ///
    /// # Errors
    /// Write failures always propagate.
    pub async fn assign_self(&self, id: i64) -> Result<Ticket> {
        let updated: Ticket =
            self.api.post_empty::<TicketDto>(&format!("/api/tickets/{id}/assign-self")).await?.into();
        self.adopt_mutation(updated.clone()).await;
        Ok(updated)
    }

    /// Assign the ticket to a specific technician.
    ///
    /// # Errors
    /// Write failures always propagate.
    pub async fn assign_to(&self, ticket_id: i64, technician_id: i64) -> Result<Ticket> {
        let path = format!("/api/tickets/{ticket_id}/assign/{technician_id}");
        let updated: Ticket = self.api.post_empty::<TicketDto>(&path).await?.into();
        self.adopt_mutation(updated.clone()).await;
        Ok(updated)
    }

    /// Append a comment to the ticket's history.
    ///
    /// The post itself propagates failures; the follow-up refresh of the
    /// active ticket and the collection resync are best-effort since the
    /// comment already landed.
    pub async fn add_comment(&self, id: i64, comment: &str) -> Result<()> {
        self.api
            .post_discard(&format!("/api/tickets/{id}/comments"), &CommentRequestDto {
                comentario: comment,
            })
            .await?;
        if let Err(err) = self.fetch_by_id(id).await {
            warn!(ticket = id, error = %err, "comment saved but ticket refresh failed");
        }
        self.fetch_all().await;
        Ok(())
    }

    /// Close the ticket with its resolution text.
    ///
    /// # Errors
    /// Write failures always propagate and leave the active ticket untouched.
    pub async fn close(&self, id: i64, solution: &str) -> Result<Ticket> {
        let updated: Ticket = self
            .api
            .post_json::<_, TicketDto>(&format!("/api/tickets/{id}/close"), &CloseRequestDto {
                solucao: solution,
            })
            .await?
            .into();
        info!(ticket = id, "ticket closed");
        self.adopt_mutation(updated.clone()).await;
        Ok(updated)
    }

    /// Reopen a terminal ticket with a reason.
    ///
    /// # Errors
    /// Write failures always propagate.
    pub async fn reopen(&self, id: i64, reason: &str) -> Result<Ticket> {
        let updated: Ticket = self
            .api
            .post_json::<_, TicketDto>(&format!("/api/tickets/{id}/reopen"), &ReopenRequestDto {
                motivo: reason,
            })
            .await?
            .into();
        info!(ticket = id, "ticket reopened");
        self.adopt_mutation(updated.clone()).await;
        Ok(updated)
    }

    /// Refresh the category and priority lists. Best-effort: on failure both
    /// lists end up empty rather than stale.
    pub async fn fetch_reference_data(&self) {
        let categories = self.api.get_json::<Vec<NamedRefDto>>("/api/categorias").await;
        let priorities = self.api.get_json::<Vec<NamedRefDto>>("/api/prioridades").await;
        match (categories, priorities) {
            (Ok(categories), Ok(priorities)) => {
                *self.categories.write().await =
                    categories.into_iter().map(Category::from).collect();
                *self.priorities.write().await =
                    priorities.into_iter().map(Priority::from).collect();
            }
            (categories, priorities) => {
                if let Err(err) = categories {
                    warn!(error = %err, "category fetch failed");
                }
                if let Err(err) = priorities {
                    warn!(error = %err, "priority fetch failed");
                }
                self.categories.write().await.clear();
                self.priorities.write().await.clear();
            }
        }
    }

    /// Create a category and append the server's authoritative record to the
    /// cached list.
    ///
    /// # Errors
    /// Write failures always propagate.
    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let created: Category = self
            .api
            .post_json::<_, NamedRefDto>("/api/categorias", &CreateNamedRefDto { nome: name })
            .await?
            .into();
        self.categories.write().await.push(created.clone());
        Ok(created)
    }

    /// Create a priority and append the server's authoritative record to the
    /// cached list.
    ///
    /// # Errors
    /// Write failures always propagate.
    pub async fn create_priority(&self, name: &str) -> Result<Priority> {
        let created: Priority = self
            .api
            .post_json::<_, NamedRefDto>("/api/prioridades", &CreateNamedRefDto { nome: name })
            .await?
            .into();
        self.priorities.write().await.push(created.clone());
        Ok(created)
    }

    /// Refresh the technician list. Best-effort.
    pub async fn fetch_technicians(&self) {
        match self.api.get_json::<Vec<NamedRefDto>>("/api/users/technicians").await {
            Ok(technicians) => {
                *self.technicians.write().await =
                    technicians.into_iter().map(Technician::from).collect();
            }
            Err(err) => {
                warn!(error = %err, "technician fetch failed");
                self.technicians.write().await.clear();
            }
        }
    }

    /// Refresh the dashboard snapshot. Best-effort: on failure the snapshot
    /// becomes absent.
    pub async fn fetch_dashboard_stats(&self) {
        match self.api.get_json::<DashboardStatsDto>("/api/dashboard/stats").await {
            Ok(stats) => *self.stats.write().await = Some(stats.into()),
            Err(err) => {
                warn!(error = %err, "dashboard stats fetch failed");
                *self.stats.write().await = None;
            }
        }
    }

    /// Download an attachment's raw bytes.
    ///
    /// # Errors
    /// Propagates transport failures; there is no partial result to fall
    /// back on.
    pub async fn download_attachment(&self, attachment_id: i64) -> Result<Vec<u8>> {
        self.api.get_bytes(&format!("/api/anexos/{attachment_id}/download")).await
    }

    /// Drop all cached state (logout).
    pub async fn clear(&self) {
        self.tickets.write().await.clear();
        *self.active.write().await = None;
        *self.sync.write().await = SyncStatus::Never;
        self.categories.write().await.clear();
        self.priorities.write().await.clear();
        self.technicians.write().await.clear();
        *self.stats.write().await = None;
    }

    /// Install a mutation response as the active ticket, then resync the
    /// collection against the server.
    async fn adopt_mutation(&self, updated: Ticket) {
        *self.active.write().await = Some(updated);
        self.fetch_all().await;
    }
}
