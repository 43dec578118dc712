//! Wire messages for the internal backend facade. Hand-written prost
//! messages; the RPC set matches what the facade actually serves.

use crate::listing::{pages_current, pages_total};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PaginationRequest {
    #[prost(int64, tag = "1")]
    pub offset: i64,
    #[prost(int64, tag = "2")]
    pub limit: i64,
    /// Wire column name; unknown names fall back to the endpoint default
    #[prost(string, tag = "3")]
    pub sort_field: ::prost::alloc::string::String,
    #[prost(bool, tag = "4")]
    pub sort_descending: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PaginationResponse {
    #[prost(int64, tag = "1")]
    pub offset: i64,
    #[prost(int64, tag = "2")]
    pub limit: i64,
    #[prost(int64, tag = "3")]
    pub total: i64,
    #[prost(int64, tag = "4")]
    pub total_filtered: i64,
    #[prost(int64, tag = "5")]
    pub pages_total: i64,
    #[prost(int64, tag = "6")]
    pub pages_current: i64,
}

impl PaginationResponse {
    pub fn build(offset: i64, limit: i64, total: i64, total_filtered: i64) -> Self {
        Self {
            offset,
            limit,
            total,
            total_filtered,
            pages_total: pages_total(total, limit),
            pages_current: pages_current(offset, limit),
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GameRow {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub icon: ::prost::alloc::string::String,
    #[prost(int64, tag = "4")]
    pub players: i64,
    #[prost(double, tag = "5")]
    pub review_score: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GroupRow {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub headline: ::prost::alloc::string::String,
    #[prost(int64, tag = "4")]
    pub members: i64,
    #[prost(double, tag = "5")]
    pub trending: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListGamesRequest {
    #[prost(message, optional, tag = "1")]
    pub pagination: ::core::option::Option<PaginationRequest>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SearchGamesRequest {
    #[prost(message, optional, tag = "1")]
    pub pagination: ::core::option::Option<PaginationRequest>,
    #[prost(string, tag = "2")]
    pub query: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListGamesResponse {
    #[prost(message, optional, tag = "1")]
    pub pagination: ::core::option::Option<PaginationResponse>,
    #[prost(message, repeated, tag = "2")]
    pub games: ::prost::alloc::vec::Vec<GameRow>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListGroupsRequest {
    #[prost(message, optional, tag = "1")]
    pub pagination: ::core::option::Option<PaginationRequest>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListGroupsResponse {
    #[prost(message, optional, tag = "1")]
    pub pagination: ::core::option::Option<PaginationResponse>,
    #[prost(message, repeated, tag = "2")]
    pub groups: ::prost::alloc::vec::Vec<GroupRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_response_math() {
        let p = PaginationResponse::build(20, 10, 105, 105);
        assert_eq!(p.pages_total, 11);
        assert_eq!(p.pages_current, 3);

        let p = PaginationResponse::build(0, 10, 0, 0);
        assert_eq!(p.pages_total, 0);
        assert_eq!(p.pages_current, 1);
    }

    // Page count runs over the whole table, not the filtered subset
    #[test]
    fn page_count_uses_the_unfiltered_total() {
        let p = PaginationResponse::build(0, 10, 100, 30);
        assert_eq!(p.pages_total, 10);
        assert_eq!(p.total_filtered, 30);
    }
}
