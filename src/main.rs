use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::Utc;
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use recienhecho::api::{DashboardEntry, HttpApi, MarketplaceApi};
use recienhecho::batches::{self, BatchForm, DashboardAggregate, ReadyIn};
use recienhecho::config::ClientConfig;
use recienhecho::onboarding::{OnboardingPipeline, OnboardingStage, Role};
use recienhecho::sign_in::sign_in;
use recienhecho::storefront::catalog;

/// Line-oriented prompt over stdin.
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn ask(&mut self, question: &str) -> anyhow::Result<String> {
        eprint!("{question}: ");
        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => bail!("stdin closed"),
        }
    }

    /// Pick one of `options` by its 1-based number.
    async fn choose<'a>(&mut self, title: &str, options: &[&'a str]) -> anyhow::Result<&'a str> {
        loop {
            eprintln!("{title}:");
            for (i, option) in options.iter().enumerate() {
                eprintln!("  {:>2}. {option}", i + 1);
            }
            let answer = self.ask("Number").await?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(options[n - 1]),
                _ => eprintln!("   Pick a number between 1 and {}", options.len()),
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ClientConfig::from_env().context("invalid configuration")?;
    let api: Arc<dyn MarketplaceApi> = Arc::new(HttpApi::new(config.clone())?);

    eprintln!("🥐 RecienHecho v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Service: {}\n", config.base_url);

    let mut prompt = Prompt::new();

    let entry = match prompt.ask("Sign in or register? [s/r]").await?.as_str() {
        "s" | "S" => loop {
            let email = prompt.ask("Email").await?;
            let password = SecretString::from(prompt.ask("Password").await?);
            match sign_in(api.as_ref(), &email, &password, Role::Creator).await {
                Ok(entry) => break entry,
                Err(e) => eprintln!("   {}", e.user_message()),
            }
        },
        _ => match onboard(&mut prompt, Arc::clone(&api), &config).await? {
            Some(entry) => entry,
            None => return Ok(()),
        },
    };

    dashboard(&mut prompt, api, &entry).await
}

/// Walk a new user through registration. Returns the store for creators.
async fn onboard(
    prompt: &mut Prompt,
    api: Arc<dyn MarketplaceApi>,
    config: &ClientConfig,
) -> anyhow::Result<Option<DashboardEntry>> {
    let role = prompt.ask("Role (creator/consumer)").await?;
    let mut pipeline = OnboardingPipeline::new(api, config, Some(&role));

    // Register
    loop {
        let name = prompt.ask("Name").await?;
        let email = prompt.ask("Email").await?;
        let password = SecretString::from(prompt.ask("Password").await?);
        match pipeline.register(&name, &email, &password).await {
            Ok(()) => break,
            Err(e) => eprintln!("   {}", e.user_message()),
        }
    }

    // Verify
    loop {
        let answer = prompt.ask("Code from your email (or 'resend')").await?;
        let Some(session) = pipeline.verification_mut() else {
            bail!("verification session missing");
        };
        if answer.eq_ignore_ascii_case("resend") {
            match session.resend() {
                Ok(()) => eprintln!("   Code entry cleared. Enter the code from your latest email."),
                Err(e) => eprintln!("   {}", e.user_message()),
            }
            continue;
        }

        if let Err(e) = session.entry_mut().fill(&answer) {
            eprintln!("   {e}");
            continue;
        }
        match pipeline.confirm().await {
            Ok(account) => {
                eprintln!("   Welcome, {}!", account.name());
                break;
            }
            Err(e) => eprintln!("   {}", e.user_message()),
        }
    }

    if pipeline.proceed()? == OnboardingStage::Notifications {
        eprintln!("   You will be notified when fresh batches are ready nearby.");
        return Ok(None);
    }

    // Address
    loop {
        let Some(stage) = pipeline.address_mut() else {
            bail!("address stage missing");
        };
        let regions: Vec<&str> = catalog::regions().collect();
        let region = prompt.choose("Region", &regions).await?;
        let draft = stage.draft_mut();
        draft.select_region(region)?;
        let city = prompt.choose("City", draft.available_cities()).await?;
        draft.select_city(city)?;
        draft.set_address(&prompt.ask("Street address").await?);

        match pipeline.continue_to_identity() {
            Ok(()) => break,
            Err(e) => eprintln!("   {}", e.user_message()),
        }
    }

    // Identity
    loop {
        let Some(stage) = pipeline.identity_mut() else {
            bail!("identity stage missing");
        };
        stage.set_business_name(&prompt.ask("Business name").await?);
        let category = prompt
            .ask(&format!("Category ({}, optional)", catalog::CATEGORIES.join("/")))
            .await?;
        if let Err(e) = stage.set_category(&category) {
            eprintln!("   {}", e.user_message());
            continue;
        }

        match pipeline.create_store().await {
            Ok(entry) => return Ok(Some(entry.clone())),
            Err(e) => eprintln!("   {}", e.user_message()),
        }
    }
}

/// List the store's batches and publish new ones until an empty product.
async fn dashboard(
    prompt: &mut Prompt,
    api: Arc<dyn MarketplaceApi>,
    entry: &DashboardEntry,
) -> anyhow::Result<()> {
    let aggregate = DashboardAggregate::new(Arc::clone(&api));
    eprintln!("\n{} · {}", entry.name, entry.address);

    loop {
        if let Err(e) = aggregate.load(&entry.store_id).await {
            eprintln!("   {}", e.user_message());
        }
        eprintln!("   Active publications: {}", aggregate.active_count().await);
        for line in aggregate.lines(Utc::now()).await {
            eprintln!("   - {} ({})", line.product, line.label());
        }

        let product = prompt.ask("\nNew batch product (empty to quit)").await?;
        if product.is_empty() {
            return Ok(());
        }
        let options: Vec<String> = ReadyIn::ALL.iter().map(ReadyIn::to_string).collect();
        let labels: Vec<&str> = options.iter().map(String::as_str).collect();
        let picked = prompt.choose("Ready in", &labels).await?;
        let ready_in = ReadyIn::ALL
            .into_iter()
            .find(|r| r.to_string() == picked)
            .unwrap_or(ReadyIn::Minutes30);

        let form = BatchForm::new(&product, ready_in);
        match batches::publish(api.as_ref(), Some(&entry.store_id), &form).await {
            Ok(_) => eprintln!("   Published!"),
            Err(e) => eprintln!("   {}", e.user_message()),
        }
    }
}
