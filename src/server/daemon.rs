//! Search server.
//!
//! Serves one `Searcher` over TCP, one thread per connection. Results are
//! cached per lowercased word: the file tree is read-only, so an answer never
//! goes stale.

use crate::config::ServerConfig;
use crate::error::{ErrorKind, SearchError};
use crate::index::IndexStats;
use crate::query::ValidatedQuery;
use crate::search::{SearchHits, Searcher};
use crate::server::protocol::{
    read_message, write_message, Request, Response, SearchResponse, StatusResponse,
};
use anyhow::{Context, Result};
use lru::LruCache;
use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Connection timeout
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Statistics for the server
struct ServerStats {
    start_time: Instant,
    queries_served: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl ServerStats {
    fn new() -> Self {
        Self {
            start_time: Instant::now(),
            queries_served: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
        }
    }

    fn cache_hit_rate(&self) -> f32 {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let misses = self.cache_misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f32 / total as f32
        }
    }
}

/// The search server
pub struct SearchServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    searcher: Box<dyn Searcher>,
    index_stats: Option<IndexStats>,
    cache: Option<Mutex<LruCache<String, SearchHits>>>,
    stats: ServerStats,
    shutdown: AtomicBool,
}

impl SearchServer {
    /// Bind the listening socket. `index_stats` is reported by `Status`.
    pub fn bind(
        config: &ServerConfig,
        searcher: Box<dyn Searcher>,
        index_stats: Option<IndexStats>,
    ) -> Result<Arc<Self>> {
        let listener = TcpListener::bind(&config.addr)
            .with_context(|| format!("Failed to bind to {}", config.addr))?;
        let local_addr = listener.local_addr()?;

        Ok(Arc::new(Self {
            listener,
            local_addr,
            searcher,
            index_stats,
            cache: NonZeroUsize::new(config.cache_size).map(|n| Mutex::new(LruCache::new(n))),
            stats: ServerStats::new(),
            shutdown: AtomicBool::new(false),
        }))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections until a `Shutdown` request arrives (blocking)
    pub fn run(self: &Arc<Self>) -> Result<()> {
        info!(addr = %self.local_addr, "server started");

        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            match stream {
                Ok(stream) => {
                    let _ = stream.set_read_timeout(Some(CONNECTION_TIMEOUT));
                    let _ = stream.set_write_timeout(Some(CONNECTION_TIMEOUT));

                    let server = Arc::clone(self);
                    thread::spawn(move || {
                        if let Err(e) = server.handle_connection(stream) {
                            warn!("connection error: {e:#}");
                        }
                    });
                }
                Err(e) => {
                    warn!("accept error: {e}");
                }
            }
        }

        info!("server stopped");
        Ok(())
    }

    /// Handle a single client connection
    fn handle_connection(&self, stream: TcpStream) -> Result<()> {
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut writer = BufWriter::new(stream);

        loop {
            let request: Request = match read_message(&mut reader) {
                Ok(req) => req,
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    // Client disconnected
                    break;
                }
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    let resp = Response::Error {
                        kind: ErrorKind::Validation,
                        message: format!("Invalid request: {}", e),
                    };
                    write_message(&mut writer, &resp)?;
                    continue;
                }
                Err(e) if e.kind() == std::io::ErrorKind::FileTooLarge => {
                    // The body was left unread, so no later frame can be found
                    let resp = Response::Error {
                        kind: ErrorKind::Validation,
                        message: format!("Invalid request: {}", e),
                    };
                    write_message(&mut writer, &resp)?;
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            let response = self.handle_request(request);
            write_message(&mut writer, &response)?;

            if matches!(response, Response::ShuttingDown) {
                // Wake the accept loop so it observes the flag
                let _ = TcpStream::connect(self.local_addr);
                break;
            }
        }

        Ok(())
    }

    /// Handle a single request
    pub fn handle_request(&self, request: Request) -> Response {
        match request {
            Request::Search { word } => self.handle_search(&word),
            Request::Status => Response::Status(self.status()),
            Request::Shutdown => {
                self.shutdown.store(true, Ordering::Relaxed);
                Response::ShuttingDown
            }
            Request::Ping => Response::Pong,
        }
    }

    fn handle_search(&self, word: &str) -> Response {
        let start = Instant::now();

        let query = match ValidatedQuery::new(word) {
            Ok(q) => q,
            Err(e) => return error_response(e.into()),
        };
        let key = query.lowercase();

        if let Some(hits) = self.cached(&key) {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            self.stats.queries_served.fetch_add(1, Ordering::Relaxed);
            return Response::Search(SearchResponse {
                files: hits.files,
                source: hits.source,
                cached: true,
                duration_ms: start.elapsed().as_secs_f64() * 1000.0,
            });
        }
        self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);

        let hits = match self.searcher.search(query.as_str()) {
            Ok(hits) => hits,
            Err(e) => {
                warn!(word = %query, "search failed: {e}");
                return error_response(e);
            }
        };

        if let Some(cache) = &self.cache
            && let Ok(mut cache) = cache.lock()
        {
            cache.put(key, hits.clone());
        }

        self.stats.queries_served.fetch_add(1, Ordering::Relaxed);

        Response::Search(SearchResponse {
            files: hits.files,
            source: hits.source,
            cached: false,
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }

    fn cached(&self, key: &str) -> Option<SearchHits> {
        let mut cache = self.cache.as_ref()?.lock().ok()?;
        cache.get(key).cloned()
    }

    fn status(&self) -> StatusResponse {
        StatusResponse {
            uptime_secs: self.stats.start_time.elapsed().as_secs(),
            queries_served: self.stats.queries_served.load(Ordering::Relaxed),
            cache_hit_rate: self.stats.cache_hit_rate(),
            index: self.index_stats.clone(),
        }
    }
}

fn error_response(err: SearchError) -> Response {
    Response::Error {
        kind: err.kind(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Scanner;
    use crate::search::{IndexedSearcher, ScanSearcher, SearchSource};
    use crate::store::MemoryStore;
    use crate::utils::TextFilter;
    use std::io::Write;

    fn server(cache_size: usize) -> Arc<SearchServer> {
        let store = MemoryStore::new()
            .with_file("doc1.txt", "Hello World")
            .with_file("doc2.txt", "hello there");
        let scanner = Scanner::new(2, TextFilter::default()).unwrap();
        let mut searcher = IndexedSearcher::new(ScanSearcher::new(Arc::new(store), scanner));
        let stats = searcher.build_index().unwrap();

        let config = ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            cache_size,
        };
        SearchServer::bind(&config, Box::new(searcher), Some(stats)).unwrap()
    }

    fn search(server: &SearchServer, word: &str) -> Response {
        server.handle_request(Request::Search { word: word.to_string() })
    }

    #[test]
    fn test_search_and_cache() {
        let server = server(8);

        let Response::Search(first) = search(&server, "Hello") else {
            panic!("expected search response");
        };
        assert!(!first.cached);
        assert_eq!(first.source, SearchSource::Index);
        assert_eq!(first.files, vec!["doc1", "doc2"]);

        // Same word, different case: served from cache
        let Response::Search(second) = search(&server, " hello ") else {
            panic!("expected search response");
        };
        assert!(second.cached);
        assert_eq!(second.files, first.files);

        let Response::Status(status) = server.handle_request(Request::Status) else {
            panic!("expected status");
        };
        assert_eq!(status.queries_served, 2);
        assert!((status.cache_hit_rate - 0.5).abs() < f32::EPSILON);
        assert_eq!(status.index.map(|s| s.files), Some(2));
    }

    #[test]
    fn test_validation_error_kind() {
        let server = server(0);
        match search(&server, "foo bar") {
            Response::Error { kind, .. } => assert_eq!(kind, ErrorKind::Validation),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_cache_disabled() {
        let server = server(0);
        for _ in 0..2 {
            let Response::Search(resp) = search(&server, "world") else {
                panic!("expected search response");
            };
            assert!(!resp.cached);
        }
    }

    fn connect(server: &Arc<SearchServer>) -> (BufReader<TcpStream>, TcpStream) {
        let stream = TcpStream::connect(server.local_addr()).unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        (BufReader::new(stream.try_clone().unwrap()), stream)
    }

    #[test]
    fn test_oversized_frame_closes_connection() {
        let server = server(1);
        let handle = {
            let server = server.clone();
            thread::spawn(move || server.run())
        };

        let (mut reader, mut writer) = connect(&server);
        writer.write_all(&(200u32 * 1024 * 1024).to_le_bytes()).unwrap();
        writer.flush().unwrap();

        match read_message::<_, Response>(&mut reader).unwrap() {
            Response::Error { kind, message } => {
                assert_eq!(kind, ErrorKind::Validation);
                assert!(message.contains("too large"), "{message}");
            }
            other => panic!("unexpected response: {other:?}"),
        }
        // The server hangs up instead of reading the body as the next frame
        let err = read_message::<_, Response>(&mut reader).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);

        // A fresh connection is served normally
        let (mut reader, mut writer) = connect(&server);
        write_message(&mut writer, &Request::Ping).unwrap();
        assert!(matches!(read_message::<_, Response>(&mut reader).unwrap(), Response::Pong));

        write_message(&mut writer, &Request::Shutdown).unwrap();
        assert!(matches!(read_message::<_, Response>(&mut reader).unwrap(), Response::ShuttingDown));
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn test_bad_json_keeps_connection() {
        let server = server(1);
        let handle = {
            let server = server.clone();
            thread::spawn(move || server.run())
        };

        let (mut reader, mut writer) = connect(&server);
        let body = b"{\"type\":\"Nope\"}";
        writer.write_all(&(body.len() as u32).to_le_bytes()).unwrap();
        writer.write_all(body).unwrap();
        writer.flush().unwrap();
        assert!(matches!(
            read_message::<_, Response>(&mut reader).unwrap(),
            Response::Error { kind: ErrorKind::Validation, .. }
        ));

        write_message(&mut writer, &Request::Ping).unwrap();
        assert!(matches!(read_message::<_, Response>(&mut reader).unwrap(), Response::Pong));

        write_message(&mut writer, &Request::Shutdown).unwrap();
        assert!(matches!(read_message::<_, Response>(&mut reader).unwrap(), Response::ShuttingDown));
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn test_ping_and_shutdown_flag() {
        let server = server(1);
        assert!(matches!(server.handle_request(Request::Ping), Response::Pong));
        assert!(matches!(
            server.handle_request(Request::Shutdown),
            Response::ShuttingDown
        ));
        assert!(server.shutdown.load(Ordering::Relaxed));
    }
}
