// Network facts: addresses and resolvers

use super::Field;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkFacts {
    pub machine_ip: Option<Field<String>>,
    pub client_ip: Option<Field<String>>,
    pub dns_servers: Option<Field<Vec<String>>>,
}
