//! Client Key Extractors
//!
//! Derives the string a visitor's bucket is keyed on. The source is chosen
//! once at startup; a request lacking that source yields the empty key.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use axum::extract::ConnectInfo;
use hyper::Request;

use crate::prelude::*;

/// Where the client key comes from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyStrategy {
	/// First entry of `X-Forwarded-For`
	#[default]
	ForwardedFor,
	/// `X-Real-IP` header
	RealIp,
	/// Peer IP of the TCP connection
	RemoteAddr,
	/// `for=` parameter of the RFC 7239 `Forwarded` header
	Forwarded,
}

impl KeyStrategy {
	pub fn as_str(&self) -> &'static str {
		match self {
			KeyStrategy::ForwardedFor => "forwarded-for",
			KeyStrategy::RealIp => "real-ip",
			KeyStrategy::RemoteAddr => "remote-addr",
			KeyStrategy::Forwarded => "forwarded",
		}
	}

	/// Extract the client key from a request
	pub fn extract<B>(&self, req: &Request<B>) -> Box<str> {
		let key = match self {
			KeyStrategy::ForwardedFor => extract_from_xff(req),
			KeyStrategy::RealIp => extract_from_x_real_ip(req),
			KeyStrategy::RemoteAddr => extract_from_peer(req),
			KeyStrategy::Forwarded => extract_from_forwarded(req),
		};
		key.unwrap_or_default().into_boxed_str()
	}
}

impl FromStr for KeyStrategy {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"forwarded-for" | "x-forwarded-for" | "xff" => Ok(KeyStrategy::ForwardedFor),
			"real-ip" | "x-real-ip" => Ok(KeyStrategy::RealIp),
			"remote-addr" | "peer" => Ok(KeyStrategy::RemoteAddr),
			"forwarded" => Ok(KeyStrategy::Forwarded),
			other => Err(Error::ValidationError(format!("unknown client key source: {}", other))),
		}
	}
}

impl std::fmt::Display for KeyStrategy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Extract the client key using the given strategy
pub fn extract_client_key<B>(req: &Request<B>, strategy: KeyStrategy) -> Box<str> {
	strategy.extract(req)
}

/// Addresses are normalized so `::1` and `0:0::1` share a bucket; anything
/// else is used verbatim.
fn normalize(value: &str) -> Option<String> {
	let value = value.trim();
	if value.is_empty() {
		return None;
	}
	Some(match value.parse::<IpAddr>() {
		Ok(ip) => ip.to_string(),
		Err(_) => value.to_string(),
	})
}

fn header_str<'a, B>(req: &'a Request<B>, name: &str) -> Option<&'a str> {
	req.headers().get(name).and_then(|h| h.to_str().ok())
}

fn extract_from_xff<B>(req: &Request<B>) -> Option<String> {
	// "client, proxy1, proxy2": the leftmost entry is the original client
	header_str(req, "x-forwarded-for").and_then(|s| s.split(',').next()).and_then(normalize)
}

fn extract_from_x_real_ip<B>(req: &Request<B>) -> Option<String> {
	header_str(req, "x-real-ip").and_then(normalize)
}

fn extract_from_peer<B>(req: &Request<B>) -> Option<String> {
	req.extensions().get::<ConnectInfo<SocketAddr>>().map(|ci| ci.0.ip().to_string())
}

fn extract_from_forwarded<B>(req: &Request<B>) -> Option<String> {
	// for=192.0.2.60;proto=http, for="[2001:db8::1]"
	let header = header_str(req, "forwarded")?;
	let first = header.split(',').next()?;
	first.split(';').find_map(|part| {
		let (name, value) = part.trim().split_once('=')?;
		if !name.trim().eq_ignore_ascii_case("for") {
			return None;
		}
		let cleaned = value.trim().trim_matches('"');
		// Bracketed IPv6 may carry a port: "[2001:db8::1]:4711"
		let cleaned = match cleaned.strip_prefix('[') {
			Some(rest) => rest.split(']').next().unwrap_or(rest),
			None => cleaned,
		};
		normalize(cleaned)
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::net::{Ipv4Addr, SocketAddrV4};

	fn request_with(name: &str, value: &str) -> Request<()> {
		Request::builder().uri("/").header(name, value).body(()).unwrap()
	}

	#[test]
	fn test_forwarded_for_takes_first_entry() {
		let req = request_with("x-forwarded-for", " 203.0.113.7 , 10.0.0.1, 10.0.0.2");
		assert_eq!(&*extract_client_key(&req, KeyStrategy::ForwardedFor), "203.0.113.7");
	}

	#[test]
	fn test_forwarded_for_keeps_non_ip_values() {
		let req = request_with("x-forwarded-for", "unknown");
		assert_eq!(&*KeyStrategy::ForwardedFor.extract(&req), "unknown");
	}

	#[test]
	fn test_ipv6_is_normalized() {
		let req = request_with("x-real-ip", "2001:0db8:0000:0000:0000:0000:0000:0001");
		assert_eq!(&*KeyStrategy::RealIp.extract(&req), "2001:db8::1");
	}

	#[test]
	fn test_missing_source_yields_empty_key() {
		let req = Request::builder().uri("/").body(()).unwrap();
		for strategy in [
			KeyStrategy::ForwardedFor,
			KeyStrategy::RealIp,
			KeyStrategy::RemoteAddr,
			KeyStrategy::Forwarded,
		] {
			assert_eq!(&*strategy.extract(&req), "", "strategy {}", strategy);
		}
	}

	#[test]
	fn test_remote_addr_uses_peer_ip_only() {
		let mut req = Request::builder().uri("/").body(()).unwrap();
		let peer = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(192, 0, 2, 10), 54321));
		req.extensions_mut().insert(ConnectInfo(peer));
		assert_eq!(&*KeyStrategy::RemoteAddr.extract(&req), "192.0.2.10");
	}

	#[test]
	fn test_forwarded_header() {
		let req = request_with("forwarded", "proto=http;For=192.0.2.60;by=203.0.113.43");
		assert_eq!(&*KeyStrategy::Forwarded.extract(&req), "192.0.2.60");

		let req = request_with("forwarded", "for=\"[2001:db8::1]:4711\", for=198.51.100.17");
		assert_eq!(&*KeyStrategy::Forwarded.extract(&req), "2001:db8::1");
	}

	#[test]
	fn test_strategy_ignores_other_headers() {
		let req = request_with("x-real-ip", "198.51.100.1");
		assert_eq!(&*KeyStrategy::ForwardedFor.extract(&req), "");
	}

	#[test]
	fn test_parse_strategy() {
		assert_eq!("forwarded-for".parse::<KeyStrategy>().unwrap(), KeyStrategy::ForwardedFor);
		assert_eq!("X-Real-IP".parse::<KeyStrategy>().unwrap(), KeyStrategy::RealIp);
		assert_eq!("remote-addr".parse::<KeyStrategy>().unwrap(), KeyStrategy::RemoteAddr);
		assert_eq!("forwarded".parse::<KeyStrategy>().unwrap(), KeyStrategy::Forwarded);
		assert!(matches!("cookie".parse::<KeyStrategy>(), Err(Error::ValidationError(_))));
	}
}

// vim: ts=4
