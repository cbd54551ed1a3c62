/*
 * Responsibility
 * - middleware の公開インターフェース
 * - access (permission guard), cors, http (request id / trace / limits)
 */
pub mod auth;
pub mod cors;
pub mod http;
