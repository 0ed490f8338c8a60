// Crate entry point. Declare and expose modules so tests and the binary can import them.
//
// Responsibilities
// - Only declare and expose modules. No business logic here.

pub mod shared {
    pub mod core {
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod document_storage;
    }
}

pub mod modules {
    pub mod attendance {
        pub mod core {
            pub mod attendance;
            pub mod calendar;
            pub mod cylinder;
            pub mod document;
            pub mod employee;
            pub mod rule;
            pub mod stats;
            pub mod status_type;
        }
        pub mod store;
        pub mod adapters {
            pub mod inbound {
                pub mod http;
            }
        }
    }
}

pub mod shell;
