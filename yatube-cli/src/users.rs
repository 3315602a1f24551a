use clap::{App, Arg, ArgMatches, SubCommand};

use yatube_models::{users::*, Connection, Error};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("users")
        .about("Manage users")
        .subcommand(
            SubCommand::with_name("new")
                .arg(
                    Arg::with_name("name")
                        .short("n")
                        .long("name")
                        .alias("username")
                        .takes_value(true)
                        .help("The username of the new user"),
                )
                .arg(
                    Arg::with_name("display-name")
                        .short("N")
                        .long("display-name")
                        .takes_value(true)
                        .help("The display name of the new user"),
                )
                .about("Create a new user"),
        )
        .subcommand(
            SubCommand::with_name("delete")
                .arg(
                    Arg::with_name("name")
                        .short("n")
                        .long("name")
                        .alias("username")
                        .takes_value(true)
                        .help("The username of the user to delete"),
                )
                .arg(
                    Arg::with_name("yes")
                        .short("y")
                        .long("yes")
                        .help("Confirm the deletion"),
                )
                .about("Delete a user, with their posts, comments and follows"),
        )
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("new", Some(x)) => new(x, conn),
        ("delete", Some(x)) => delete(x, conn),
        ("", None) => command().print_help().unwrap(),
        _ => println!("Unknown subcommand"),
    }
}

fn new<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let username = args
        .value_of("name")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Username"));
    let display_name = args
        .value_of("display-name")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Display name"));

    match User::create(conn, &username, &display_name) {
        Ok(user) => println!("User {} created", user),
        Err(Error::UserAlreadyExists) => eprintln!("The username {} is already taken", username),
        Err(e) => panic!("Couldn't create the user: {}", e),
    }
}

fn delete<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let username = args
        .value_of("name")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Username"));
    let user = User::find_by_username(conn, &username).expect("User not found");

    if !args.is_present("yes") {
        let confirm = super::ask_for(&format!(
            "Delete {} and everything they wrote? [y/N]",
            user
        ));
        if !matches!(confirm.trim(), "y" | "Y" | "yes") {
            println!("Nothing was deleted");
            return;
        }
    }
    user.delete(conn).expect("Couldn't delete the user");
    println!("User {} deleted", username);
}
