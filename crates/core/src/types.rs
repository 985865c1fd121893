/// Server-assigned job identifier. Opaque to the client.
pub type JobUuid = String;
