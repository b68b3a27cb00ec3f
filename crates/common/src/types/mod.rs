use serde::{Deserialize, Serialize};

/// Plain acknowledgement body used by health checks and write endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct Ack {
    pub ok: bool,
}
