// Handshake client - One connection, one ClientHello, one ServerHello

use super::handshake::{ClientHello, ServerHello, ServerHelloParser};
use super::{CONTENT_TYPE_HANDSHAKE, ProtocolVersion, RECORD_HEADER_LEN};
use crate::error::ProbeError;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Anything that can run a single ClientHello/ServerHello exchange.
///
/// Discovery and order detection are written against this trait so they can
/// be driven by a real endpoint or by a simulated server.
#[async_trait]
pub trait Handshaker: Send + Sync {
    /// Offer `cipher_suites` in order and return the suite the server picked
    async fn hello(
        &self,
        version: ProtocolVersion,
        cipher_suites: &[u16],
        curves: &[u16],
    ) -> Result<u16, ProbeError>;
}

/// Handshake client bound to one endpoint
#[derive(Debug, Clone)]
pub struct HandshakeClient {
    addr: SocketAddr,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl HandshakeClient {
    /// Create new handshake client
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(5),
        }
    }

    /// Set connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Run one attempt on a fresh connection.
    ///
    /// The stream is owned by this call and dropped (closed) on every
    /// return path.
    pub async fn attempt(
        &self,
        version: ProtocolVersion,
        cipher_suites: &[u16],
        curves: &[u16],
    ) -> Result<u16, ProbeError> {
        let hello = ClientHello::new(version, cipher_suites, curves)?;

        let mut stream = self.connect().await?;

        let record = hello.encode();

        let exchange = async {
            stream
                .write_all(&record)
                .await
                .map_err(|e| ProbeError::from_connect(self.addr, e))?;

            let body = read_handshake_record(&mut stream).await?;
            Ok::<ServerHello, ProbeError>(ServerHelloParser::parse(&body)?)
        };

        let server_hello = timeout(self.read_timeout, exchange)
            .await
            .map_err(|_| ProbeError::Timeout {
                duration: self.read_timeout,
                addr: self.addr,
            })??;

        // Best effort; the socket is closed on drop either way
        let _ = stream.shutdown().await;

        tracing::debug!(
            "{} offered {} suites to {}, server chose 0x{:04x} (version {})",
            version,
            cipher_suites.len(),
            self.addr,
            server_hello.cipher_suite,
            server_hello.version
        );

        Ok(server_hello.cipher_suite)
    }

    async fn connect(&self) -> Result<TcpStream, ProbeError> {
        match timeout(self.connect_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(ProbeError::from_connect(self.addr, e)),
            Err(_) => Err(ProbeError::ConnectionTimeout {
                duration: self.connect_timeout,
                addr: self.addr,
            }),
        }
    }
}

#[async_trait]
impl Handshaker for HandshakeClient {
    async fn hello(
        &self,
        version: ProtocolVersion,
        cipher_suites: &[u16],
        curves: &[u16],
    ) -> Result<u16, ProbeError> {
        self.attempt(version, cipher_suites, curves).await
    }
}

/// Read one handshake record and return its body.
///
/// Reads the 5-byte record header, checks the content type, then keeps
/// reading until the declared length has arrived.
pub async fn read_handshake_record<R>(reader: &mut R) -> Result<Vec<u8>, ProbeError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; RECORD_HEADER_LEN];
    read_full(reader, &mut header).await?;

    if header[0] != CONTENT_TYPE_HANDSHAKE {
        return Err(ProbeError::UnexpectedRecordType(header[0]));
    }

    let length = u16::from_be_bytes([header[3], header[4]]) as usize;
    let mut body = vec![0u8; length];
    read_full(reader, &mut body).await?;

    Ok(body)
}

/// Fill `buf` completely, looping over short reads
async fn read_full<R>(reader: &mut R, buf: &mut [u8]) -> Result<(), ProbeError>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = match reader.read(&mut buf[filled..]).await {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!("Read failed after {} bytes: {}", filled, e);
                0
            }
        };

        if n == 0 {
            return Err(ProbeError::PrematureClose {
                received: filled,
                expected: buf.len(),
            });
        }
        filled += n;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content_type: u8, body: &[u8]) -> Vec<u8> {
        let mut data = vec![content_type, 0x03, 0x03];
        data.extend_from_slice(&(body.len() as u16).to_be_bytes());
        data.extend_from_slice(body);
        data
    }

    #[tokio::test]
    async fn test_read_record_body() {
        let data = record(0x16, &[1, 2, 3, 4]);
        let body = read_handshake_record(&mut data.as_slice()).await.unwrap();
        assert_eq!(body, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_read_record_short_header() {
        let data = [0x16, 0x03, 0x03];
        let err = read_handshake_record(&mut data.as_slice())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProbeError::PrematureClose {
                received: 3,
                expected: 5
            }
        ));
    }

    #[tokio::test]
    async fn test_read_record_alert() {
        let data = record(0x15, &[0x02, 0x28]);
        let err = read_handshake_record(&mut data.as_slice())
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::UnexpectedRecordType(0x15)));
    }

    #[tokio::test]
    async fn test_read_record_truncated_body() {
        let mut data = record(0x16, &[0u8; 10]);
        data.truncate(9);
        let err = read_handshake_record(&mut data.as_slice())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProbeError::PrematureClose {
                received: 4,
                expected: 10
            }
        ));
    }

    #[tokio::test]
    async fn test_read_record_fragmented() {
        let data = record(0x16, &[9u8; 300]);
        let (mut client, mut server) = tokio::io::duplex(16);

        let writer = tokio::spawn(async move {
            for chunk in data.chunks(7) {
                server.write_all(chunk).await.unwrap();
                tokio::task::yield_now().await;
            }
        });

        let body = read_handshake_record(&mut client).await.unwrap();
        writer.await.unwrap();

        assert_eq!(body.len(), 300);
        assert!(body.iter().all(|b| *b == 9));
    }

    #[tokio::test]
    async fn test_attempt_rejects_empty_offer_before_connecting() {
        // Port 9 on loopback is never contacted: validation fails first
        let client = HandshakeClient::new("127.0.0.1:9".parse().unwrap());
        let err = client
            .attempt(ProtocolVersion::TLS12, &[], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_attempt_sends_encoded_record() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let expected = ClientHello::new(ProtocolVersion::TLS11, &[0x002f, 0x0035], &[0x0017])
            .unwrap()
            .encode();
        let expected_len = expected.len();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = vec![0u8; expected_len];
            socket.read_exact(&mut received).await.unwrap();

            // ServerHello: version, random, empty session id, suite, compression
            let mut body = vec![0x02, 0x00, 0x00, 0x26, 0x03, 0x02];
            body.extend_from_slice(&[0u8; 32]);
            body.extend_from_slice(&[0x00, 0x00, 0x35, 0x00]);
            socket.write_all(&record(0x16, &body)).await.unwrap();
            received
        });

        let chosen = HandshakeClient::new(addr)
            .attempt(ProtocolVersion::TLS11, &[0x002f, 0x0035], &[0x0017])
            .await
            .unwrap();

        assert_eq!(chosen, 0x0035);
        assert_eq!(server.await.unwrap(), expected);
    }
}
