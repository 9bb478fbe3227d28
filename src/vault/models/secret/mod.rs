pub mod kv2;
