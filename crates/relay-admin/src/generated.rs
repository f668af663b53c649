#![allow(clippy::all)]

tonic::include_proto!("dimo.meta_transaction_processor.v1");
