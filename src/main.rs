//! Cinema booking client CLI

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_client::{
    booking::{PaymentForm, SeatOutcome, Step},
    config::Config,
    models::SeatStatus,
    router::{nav_items, Route},
    views::{
        admin::{AdminPanel, AdminTab},
        booking::BookingView,
        catalog::CatalogView,
        login::{logout, LoginView},
        movie_detail::{MovieDetailView, TIME_LABEL},
        my_tickets::MyTicketsView,
        Banner, BannerKind,
    },
    App,
};

#[derive(Parser)]
#[command(name = "cinema")]
#[command(about = "Browse movies, pick seats and manage the cinema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user and available sections
    Whoami,

    /// List movies
    Movies {
        /// Case-insensitive search in title and description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Movie details with upcoming showtimes
    Movie { id: i64 },

    /// Seat map for a screening
    Seats { movie_id: i64, screening_id: i64 },

    /// Book seats and pay
    Book {
        movie_id: i64,
        screening_id: i64,

        /// Seats to book (comma-separated, e.g. A1,B2)
        #[arg(short, long, value_delimiter = ',')]
        seats: Vec<String>,

        #[arg(long)]
        cardholder: String,
        #[arg(long)]
        card_number: String,
        /// MM/YY
        #[arg(long)]
        expiry: String,
        #[arg(long)]
        cvc: String,
    },

    /// My tickets
    Tickets,

    /// Administration (admins only)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Revenue, tickets sold and movie count
    Stats,

    /// All movies
    Movies,

    /// Halls available for new screenings
    Halls,

    /// Screenings of one movie
    Screenings { movie_id: i64 },

    /// Import a movie from TMDB
    Import { tmdb_id: String },

    /// Delete a movie and all its screenings
    DeleteMovie {
        id: i64,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Delete a screening
    DeleteScreening {
        id: i64,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Create a screening
    CreateScreening {
        #[arg(long)]
        movie: i64,
        #[arg(long)]
        hall: i64,
        /// Local start time, e.g. 2026-11-02T18:30
        #[arg(long)]
        start: String,
        #[arg(long, default_value = "12.50")]
        price: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let app = App::bootstrap(config).context("Failed to initialize API client")?;

    match cli.command {
        Commands::Login { username, password } => cmd_login(&app, username, password).await,
        Commands::Logout => {
            logout(&app.session, &app.navigator);
            println!("Signed out");
            Ok(())
        }
        Commands::Whoami => cmd_whoami(&app),
        Commands::Movies { search } => cmd_movies(&app, search).await,
        Commands::Movie { id } => cmd_movie(&app, id).await,
        Commands::Seats { movie_id, screening_id } => cmd_seats(&app, movie_id, screening_id).await,
        Commands::Book { movie_id, screening_id, seats, cardholder, card_number, expiry, cvc } => {
            let card = PaymentForm { cardholder, card_number, expiry, cvc };
            cmd_book(&app, movie_id, screening_id, &seats, &card).await
        }
        Commands::Tickets => cmd_tickets(&app).await,
        Commands::Admin { command } => cmd_admin(&app, command).await,
    }
}

/// Переход на маршрут; если охрана увела в другое место, команда не выполняется.
fn enter(app: &App, route: Route) -> Result<()> {
    let resolved = app.navigate(route.clone());
    if resolved != route {
        match resolved {
            Route::Login => bail!("Not signed in. Run `cinema login` first."),
            _ => bail!("Access denied to {}", route),
        }
    }
    Ok(())
}

async fn cmd_login(app: &App, username: String, password: String) -> Result<()> {
    let mut view = LoginView::new(username, password);
    match view.submit(&app.api).await {
        Some(identity) => {
            println!("Welcome, {} ({})", identity.name, identity.role.label());
            Ok(())
        }
        None => bail!(view.error.unwrap_or_else(|| "Login failed".to_string())),
    }
}

fn cmd_whoami(app: &App) -> Result<()> {
    let Some(identity) = app.session.identity() else {
        println!("Not signed in");
        return Ok(());
    };
    println!("{} <{}> {}", identity.name, identity.email, identity.role.label());
    for item in nav_items(&identity) {
        println!("  {:<14} {}", item.label, item.route);
    }
    Ok(())
}

async fn cmd_movies(app: &App, search: Option<String>) -> Result<()> {
    enter(app, Route::Catalog)?;
    let mut view = CatalogView::default();
    view.load(&app.api).await;
    if let Some(error) = view.error.take() {
        bail!(error);
    }

    let movies = view.search(search.as_deref().unwrap_or_default());
    if movies.is_empty() {
        println!("No movies found");
    }
    for movie in movies {
        let rating = movie.rating.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {:<40} {:>4}  {:>7}  {}",
            movie.id,
            movie.title,
            rating,
            movie.duration_label(),
            movie.genres.join(", ")
        );
    }
    Ok(())
}

async fn cmd_movie(app: &App, id: i64) -> Result<()> {
    enter(app, Route::MovieDetail(id))?;
    let view = MovieDetailView::load(&app.api, id, Local::now().naive_local()).await?;
    let Some(movie) = view.movie.as_ref() else { bail!("Movie not found") };

    println!("{} ({})", movie.title, movie.duration_label());
    if let Some(director) = &movie.director {
        println!("Director: {}", director);
    }
    if let Some(release) = movie.release_date {
        println!("Released: {}", release);
    }
    if let Some(description) = &movie.description {
        println!("\n{}\n", description);
    }

    if !view.has_showtimes() {
        println!("No upcoming showtimes");
    }
    for group in &view.showtimes {
        println!("{}", group.date_label);
        for s in &group.screenings {
            println!(
                "  [{}] {}  {:<4} {:<12} ${:.2}",
                s.id,
                s.start_time.format(TIME_LABEL),
                s.presentation.label(),
                s.hall_name.as_deref().unwrap_or("-"),
                s.price
            );
        }
    }
    Ok(())
}

fn print_seat_map(view: &BookingView) {
    let flow = view.flow();
    let screening = flow.screening();
    println!(
        "{} | {} | {} | base ${:.2}",
        view.movie().title,
        screening.start_time.format("%a, %b %-d %H:%M"),
        screening.hall_name.as_deref().unwrap_or("-"),
        screening.price
    );
    println!("            SCREEN");
    for (row, seats) in flow.seat_map().rows() {
        let cells: String = seats
            .iter()
            .map(|seat| match flow.seat_map().display_status(seat, flow.selected_ids()) {
                SeatStatus::Available => " o",
                SeatStatus::Vip => " V",
                SeatStatus::Selected => " *",
                SeatStatus::Occupied | SeatStatus::Locked => " x",
            })
            .collect();
        println!("{} {}", row, cells);
    }
    println!("o available  V vip  * selected  x taken");
}

async fn cmd_seats(app: &App, movie_id: i64, screening_id: i64) -> Result<()> {
    enter(app, Route::Booking { movie_id, screening_id })?;
    let view = BookingView::load(&app.api, movie_id, screening_id).await?;
    print_seat_map(&view);
    Ok(())
}

async fn cmd_book(
    app: &App,
    movie_id: i64,
    screening_id: i64,
    seats: &[String],
    card: &PaymentForm,
) -> Result<()> {
    enter(app, Route::Booking { movie_id, screening_id })?;
    let mut view = BookingView::load(&app.api, movie_id, screening_id).await?;

    for seat in seats {
        let seat = seat.trim().to_uppercase();
        view.toggle(&seat).with_context(|| format!("Cannot select seat {}", seat))?;
    }
    print_seat_map(&view);
    {
        let flow = view.flow();
        println!("Total: ${:.2}  (hold {})", flow.total_price(), flow.format_remaining());
    }

    view.proceed_to_payment()?;
    let report = view.pay(&app.api, card).await?;

    for result in &report.results {
        match &result.outcome {
            SeatOutcome::Committed(_) => println!("  {} booked", result.seat_id),
            SeatOutcome::Failed(reason) => println!("  {} failed: {}", result.seat_id, reason),
            SeatOutcome::Skipped => println!("  {} not attempted", result.seat_id),
        }
    }

    let step = view.flow().step();
    if step == Step::Confirmation {
        println!("Booking confirmed. See `cinema tickets`.");
        return Ok(());
    }
    if !app.session.is_signed_in() {
        warn!("Session expired during checkout");
    }
    bail!(report.summary().unwrap_or("Booking failed"))
}

async fn cmd_tickets(app: &App) -> Result<()> {
    enter(app, Route::MyTickets)?;
    let mut view = MyTicketsView::default();
    view.load(&app.api).await;
    if let Some(error) = view.error.take() {
        bail!(error);
    }
    if view.tickets.is_empty() {
        println!("You have no tickets yet");
    }
    for ticket in &view.tickets {
        let when = ticket
            .start_time
            .map(|t| t.format("%a, %b %-d %H:%M").to_string())
            .unwrap_or_else(|| "TBA".to_string());
        println!(
            "#{}  {:<32} {}  {}  Row {} Seat {}  {}",
            ticket.short_id(),
            ticket.movie_title,
            when,
            ticket.hall_name,
            ticket.row,
            ticket.number,
            ticket.status
        );
    }
    Ok(())
}

fn print_banner(banner: Option<&Banner>) -> Result<()> {
    match banner {
        Some(b) if b.kind == BannerKind::Error => bail!(b.text.clone()),
        Some(b) => {
            println!("{}", b.text);
            Ok(())
        }
        None => Ok(()),
    }
}

async fn cmd_admin(app: &App, command: AdminCommands) -> Result<()> {
    enter(app, Route::Admin)?;
    let mut panel = AdminPanel::new(app.api.clone());

    match command {
        AdminCommands::Stats => {
            panel.select_tab(AdminTab::Stats).await;
            let stats = panel.state.stats.clone().unwrap_or_default();
            println!("Total revenue: ${:.2}", stats.total_revenue);
            println!("Tickets sold:  {}", stats.tickets_sold);
            println!("Movies:        {}", stats.movies_count);
        }
        AdminCommands::Movies => {
            panel.select_tab(AdminTab::Movies).await;
            for movie in &panel.state.movies {
                println!("{:>5}  {}", movie.id, movie.title);
            }
        }
        AdminCommands::Halls => {
            panel.select_tab(AdminTab::Create).await;
            for hall in &panel.state.halls {
                println!("{:>5}  {} ({}x{})", hall.id, hall.name, hall.rows, hall.seats_per_row);
            }
        }
        AdminCommands::Screenings { movie_id } => {
            panel.select_tab(AdminTab::Sessions).await;
            panel.choose_session_movie(Some(movie_id)).await;
            for s in &panel.state.screenings {
                println!(
                    "{:>5}  {}  {:<12} ${:.2}",
                    s.id,
                    s.start_time.format("%Y-%m-%d %H:%M"),
                    s.hall_name.as_deref().unwrap_or("-"),
                    s.price
                );
            }
        }
        AdminCommands::Import { tmdb_id } => {
            panel.select_tab(AdminTab::Import).await;
            panel.state.tmdb_id = tmdb_id;
            panel.import_movie().await;
        }
        AdminCommands::DeleteMovie { id, yes } => {
            if !yes {
                bail!("Deleting movie {} removes all its screenings. Re-run with --yes to confirm.", id);
            }
            panel.select_tab(AdminTab::Movies).await;
            panel.delete_movie(id).await;
        }
        AdminCommands::DeleteScreening { id, yes } => {
            if !yes {
                bail!("Re-run with --yes to delete screening {}.", id);
            }
            panel.delete_screening(id).await;
        }
        AdminCommands::CreateScreening { movie, hall, start, price } => {
            panel.select_tab(AdminTab::Create).await;
            panel.state.create_form.movie_id = Some(movie);
            panel.state.create_form.hall_id = Some(hall);
            panel.state.create_form.date = start;
            panel.state.create_form.price = price;
            panel.create_screening().await;
        }
    }

    info!("Admin command done");
    print_banner(panel.state.banner.as_ref())
}
