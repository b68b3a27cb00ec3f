pub mod tenant_state;
