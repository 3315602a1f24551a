use clap::{App, Arg, ArgMatches, SubCommand};

use yatube_models::{feed::Feed, pagination::Page, users::User, Connection};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("feed")
        .about("Inspect follow feeds")
        .subcommand(
            SubCommand::with_name("show")
                .arg(
                    Arg::with_name("user")
                        .short("u")
                        .long("user")
                        .takes_value(true)
                        .help("Username of the reader"),
                )
                .arg(
                    Arg::with_name("page")
                        .short("p")
                        .long("page")
                        .takes_value(true)
                        .help("Page to show, starting at 1"),
                )
                .about("Print one page of the posts a user follows"),
        )
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("show", Some(x)) => show(x, conn),
        ("", None) => command().print_help().unwrap(),
        _ => println!("Unknown subcommand"),
    }
}

fn show<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let username = args
        .value_of("user")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Username"));
    let user = User::find_by_username(conn, &username).expect("User not found");
    let page = Page::from_query(args.value_of("page"));

    let feed = Feed::for_conn(conn)
        .page(Some(&user), page)
        .expect("Couldn't build the feed");
    println!(
        "Page {} of {} for {}",
        feed.current_page,
        feed.total_pages.max(1),
        user
    );
    for post in feed.items {
        let author = post
            .get_author(conn)
            .map(|a| a.username)
            .unwrap_or_default();
        println!(
            "#{}\t{}\t{}\t{}",
            post.id,
            post.created_at.format("%Y-%m-%d %H:%M"),
            author,
            post
        );
    }
}
