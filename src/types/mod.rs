pub mod waterml;
