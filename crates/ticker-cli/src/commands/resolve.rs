//! 대화식 이름 해석.
//!
//! 애매한 후보는 "Did you mean ...?"로 묻고 `y`/`Y`일 때만 채택합니다.

use std::io::{BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use ticker_core::{clean_user_input, AppConfig};
use ticker_data::{Candidate, Confirmer, Resolver, ResolverThresholds};

use super::open_ticker_table;

/// 입력/출력 스트림으로 확인을 받는 확인기.
///
/// 읽기는 블로킹 스레드에서 수행합니다.
pub struct PromptConfirmer<R, W> {
    io: Arc<PromptIo<R, W>>,
}

struct PromptIo<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl<R, W> PromptConfirmer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Arc::new(PromptIo {
                input: Mutex::new(input),
                output: Mutex::new(output),
            }),
        }
    }
}

impl PromptConfirmer<BufReader<Stdin>, Stdout> {
    /// 표준 입출력 확인기.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptIo<R, W> {
    /// 후보를 묻고 한 줄을 읽습니다. 입출력 실패는 빈 응답입니다.
    fn ask(&self, company_name: &str) -> String {
        {
            let mut output = self.output.lock().unwrap_or_else(|p| p.into_inner());
            let prompt = writeln!(output, "Did you mean {}?", company_name)
                .and_then(|_| write!(output, "Type 'Y' to confirm, or 'N' to cancel: "))
                .and_then(|_| output.flush());
            if prompt.is_err() {
                return String::new();
            }
        }

        let mut answer = String::new();
        let mut input = self.input.lock().unwrap_or_else(|p| p.into_inner());
        if let Err(e) = input.read_line(&mut answer) {
            debug!(error = %e, "Failed to read confirmation");
            return String::new();
        }
        answer
    }
}

#[async_trait]
impl<R, W> Confirmer for PromptConfirmer<R, W>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    async fn confirm(&self, candidate: &Candidate) -> String {
        let io = Arc::clone(&self.io);
        let company_name = candidate.company_name.clone();

        match tokio::task::spawn_blocking(move || io.ask(&company_name)).await {
            Ok(answer) => answer,
            Err(e) => {
                debug!(error = %e, "Confirmation prompt task failed");
                String::new()
            }
        }
    }
}

/// 해석 결과 문구.
pub fn render_result(symbol: Option<&str>) -> String {
    match symbol {
        Some(symbol) => format!("Stock Ticker: {}", symbol),
        None => "Stock not found in database".to_string(),
    }
}

/// 입력 인자를 합쳐 하나의 질의로 만듭니다. 비어 있으면 표준 입력에서 읽습니다.
fn read_query(words: &[String]) -> Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }

    print!("Enter stock ticker or company name: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line)
}

/// 로컬 티커 테이블로 입력을 해석하고 결과를 출력합니다.
pub async fn run(config: &AppConfig, words: &[String], db_url: Option<&str>) -> Result<Option<String>> {
    let words = words.to_vec();
    let query = tokio::task::spawn_blocking(move || read_query(&words))
        .await
        .context("Input task failed")??;
    let table = open_ticker_table(config, db_url).await?;
    let resolver = Resolver::new(Arc::new(table), ResolverThresholds::from(&config.resolver));

    debug!(query = %clean_user_input(&query), "Resolving");
    let symbol = resolver
        .resolve_interactive(&query, &PromptConfirmer::stdio())
        .await?;

    println!("{}", render_result(symbol.as_deref()));
    Ok(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use ticker_core::TickerRecord;
    use ticker_data::{StaticTickerTable, TickerTable};

    impl<R, W> PromptConfirmer<R, W> {
        fn into_output(self) -> W {
            match Arc::try_unwrap(self.io) {
                Ok(io) => io.output.into_inner().unwrap_or_else(|p| p.into_inner()),
                Err(_) => panic!("prompt io still shared"),
            }
        }
    }

    fn candidate() -> Candidate {
        Candidate {
            symbol: "AAPL".to_string(),
            company_name: "Apple Inc.".to_string(),
            score: 72,
        }
    }

    #[tokio::test]
    async fn test_prompt_text_and_answer() {
        let confirmer = PromptConfirmer::new(Cursor::new(b"Y\n".to_vec()), Vec::new());
        let answer = confirmer.confirm(&candidate()).await;
        assert_eq!(answer, "Y\n");

        let output = String::from_utf8(confirmer.into_output()).unwrap();
        assert_eq!(
            output,
            "Did you mean Apple Inc.?\nType 'Y' to confirm, or 'N' to cancel: "
        );
    }

    #[tokio::test]
    async fn test_empty_input_is_empty_answer() {
        let confirmer = PromptConfirmer::new(Cursor::new(Vec::new()), Vec::new());
        assert_eq!(confirmer.confirm(&candidate()).await, "");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_prompt_read_does_not_block_runtime() {
        // 블로킹 읽기 중에도 같은 런타임의 다른 작업이 진행되어야 함
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        struct GatedReader(std::sync::mpsc::Receiver<()>, bool);
        impl std::io::Read for GatedReader {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.1 {
                    return Ok(0);
                }
                let _ = self.0.recv();
                self.1 = true;
                buf[0] = b'y';
                Ok(1)
            }
        }

        let confirmer = PromptConfirmer::new(BufReader::new(GatedReader(rx, false)), Vec::new());
        let release = tokio::spawn(async move {
            tokio::task::yield_now().await;
            tx.send(()).unwrap();
        });

        let answer = confirmer.confirm(&candidate()).await;
        release.await.unwrap();
        assert_eq!(answer, "y");
    }

    #[test]
    fn test_render_result() {
        assert_eq!(render_result(Some("MSFT")), "Stock Ticker: MSFT");
        assert_eq!(render_result(None), "Stock not found in database");
    }

    #[tokio::test]
    async fn test_prompt_confirmer_drives_resolver() {
        let table: Arc<dyn TickerTable> = Arc::new(StaticTickerTable::new(vec![
            TickerRecord::new("AAPL", "Apple Inc.").unwrap(),
        ]));
        let resolver = Resolver::new(table, ResolverThresholds { high: 95, low: 60 });

        let accept = PromptConfirmer::new(Cursor::new(b"y\n".to_vec()), Vec::new());
        let symbol = resolver
            .resolve_interactive("Apple Computer", &accept)
            .await
            .unwrap();
        assert_eq!(symbol.as_deref(), Some("AAPL"));

        let decline = PromptConfirmer::new(Cursor::new(b"N\n".to_vec()), Vec::new());
        let symbol = resolver
            .resolve_interactive("Apple Computer", &decline)
            .await
            .unwrap();
        assert!(symbol.is_none());
    }
}
